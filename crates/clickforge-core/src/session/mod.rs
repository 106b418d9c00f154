//! Generation session: workflow step, status and the in-flight request slot.

pub mod in_flight;
pub mod machine;
pub mod status;

pub use in_flight::{InFlightSlot, RequestKind, RequestTicket};
pub use machine::{
    AnalysisRequest, GenerationSession, RefineRequest, RefinedImage, RenderRequest, Settlement,
};
pub use status::{FailureKind, Rejection, SessionStatus, WorkflowStep};
