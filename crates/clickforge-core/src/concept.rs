//! Thumbnail concepts produced by brainstorming.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How one audience segment is expected to react to a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceSentiment {
    pub segment: String,
    pub reaction: String,
}

/// Concept fields as returned by the model, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDraft {
    pub title: String,
    pub description: String,
    pub visual_prompt: String,
    pub overlay_text: String,
    #[serde(default)]
    pub overlay_variants: Vec<String>,
    pub psychology: String,
    #[serde(default)]
    pub color_palette: Vec<String>,
    #[serde(default)]
    pub audience_sentiment: Vec<AudienceSentiment>,
}

/// A candidate visual direction for a thumbnail.
///
/// Concepts are created once and only ever copied afterwards; a result owns
/// its own copy of the concept it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub title: String,
    pub description: String,
    pub visual_prompt: String,
    pub overlay_text: String,
    pub overlay_variants: Vec<String>,
    pub psychology: String,
    pub color_palette: Vec<String>,
    pub audience_sentiment: Vec<AudienceSentiment>,
}

impl Concept {
    /// Assigns a fresh identity to a drafted concept.
    pub fn from_draft(draft: ConceptDraft) -> Self {
        Self {
            id: format!("concept-{}", Uuid::new_v4()),
            title: draft.title,
            description: draft.description,
            visual_prompt: draft.visual_prompt,
            overlay_text: draft.overlay_text,
            overlay_variants: draft.overlay_variants,
            psychology: draft.psychology,
            color_palette: draft.color_palette,
            audience_sentiment: draft.audience_sentiment,
        }
    }

    /// Lowercase, dash separated title used for exported file names.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        for word in self.title.split_whitespace() {
            if !slug.is_empty() {
                slug.push('-');
            }
            slug.extend(
                word.chars()
                    .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                    .flat_map(char::to_lowercase),
            );
        }
        slug
    }
}

/// A grounding source surfaced while researching current trends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub title: String,
    pub uri: String,
}

/// Everything brainstorming returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrainstormOutcome {
    pub concepts: Vec<Concept>,
    pub trends: Vec<TrendSignal>,
}
