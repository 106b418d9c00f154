//! Application layer for ClickForge.
//!
//! Coordinates the session state machine, the studio collaborator and the
//! history vault.

pub mod history;
pub mod session_usecase;

#[cfg(test)]
mod test_support;

pub use history::HistoryStore;
pub use session_usecase::{OperationOutcome, SessionUseCase};
