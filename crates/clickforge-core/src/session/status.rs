//! Status, navigation and failure types for the generation workflow.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Lifecycle of the remote call the session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum SessionStatus {
    #[default]
    Idle,
    AnalyzingMarket,
    GeneratingImage,
    Refining,
    Completed,
    Failed,
}

impl SessionStatus {
    /// True while a remote call is outstanding.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SessionStatus::AnalyzingMarket | SessionStatus::GeneratingImage | SessionStatus::Refining
        )
    }
}

/// Navigational mode of the workspace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WorkflowStep {
    /// Collecting generation parameters.
    #[default]
    Setup,
    /// Choosing among brainstormed concepts.
    Strategy,
    /// Browsing the history of past results.
    Vault,
}

/// Which operation failed. The underlying cause is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum FailureKind {
    AnalysisFailed,
    ImageGenerationFailed,
    RefinementFailed,
}

impl FailureKind {
    /// Static message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::AnalysisFailed => {
                "Market analysis interrupted. Please check your network and try again."
            }
            FailureKind::ImageGenerationFailed => {
                "Image engine failed. Trying a different prompt might help."
            }
            FailureKind::RefinementFailed => "Refinement unsuccessful. Our AI brush ran out of ink.",
        }
    }
}

/// Why an operation was not started. Rejections never change session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("a topic is required before analysis can start")]
    EmptyTopic,
    #[error("refinement needs an instruction")]
    EmptyInstruction,
    #[error("there is no active result to refine")]
    NoActiveResult,
    #[error("another request is still running ({0})")]
    Busy(SessionStatus),
    #[error("concept '{0}' is not part of the current strategy")]
    UnknownConcept(String),
}
