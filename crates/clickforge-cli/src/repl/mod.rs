//! Interactive studio prompt.

pub mod command;
pub mod helper;
