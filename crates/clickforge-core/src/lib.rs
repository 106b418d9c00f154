//! Domain layer for ClickForge.
//!
//! Holds the data model, the generation session state machine and the traits
//! the outer layers implement (`StudioService`, `HistoryRepository`,
//! `SecretService`). Nothing in this crate performs I/O.

pub mod concept;
pub mod config;
pub mod error;
pub mod history;
pub mod image;
pub mod params;
pub mod secret;
pub mod session;
pub mod studio;
pub mod thumbnail;

pub use concept::{AudienceSentiment, BrainstormOutcome, Concept, ConceptDraft, TrendSignal};
pub use error::{ClickforgeError, Result};
pub use image::ImageData;
pub use params::{AspectRatio, GenerationParams, ParamField};
pub use session::{GenerationSession, SessionStatus, WorkflowStep};
pub use studio::StudioService;
pub use thumbnail::{SeoBundle, Thumbnail};
