pub mod studio;
pub mod vault;
