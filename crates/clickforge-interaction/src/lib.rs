//! Gemini-backed implementation of the studio collaborator.

pub mod gemini_studio;
pub mod prompts;
mod wire;

pub use gemini_studio::GeminiStudio;
pub use prompts::PromptTemplates;
