//! Rendered thumbnails and their supporting metadata.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::concept::Concept;
use crate::image::ImageData;
use crate::params::GenerationParams;

/// Titles and tags suggested for the video a thumbnail belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoBundle {
    #[serde(default)]
    pub suggested_titles: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The outcome of rendering one concept.
///
/// Serialized with the same camelCase record layout the vault has always
/// used (`id`, `imageUrl`, `concept`, `timestamp`, `seo`, `params`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub id: String,
    #[serde(rename = "imageUrl")]
    pub image: ImageData,
    pub concept: Concept,
    /// Creation time in Unix milliseconds.
    pub timestamp: i64,
    pub seo: SeoBundle,
    pub params: GenerationParams,
}

impl Thumbnail {
    /// Creates a result with a fresh id and the current time.
    ///
    /// `params` must already be the snapshot taken when generation started.
    pub fn new(
        image: ImageData,
        concept: Concept,
        seo: SeoBundle,
        params: GenerationParams,
    ) -> Self {
        Self {
            id: format!("thumb-{}", Uuid::new_v4()),
            image,
            concept,
            timestamp: Utc::now().timestamp_millis(),
            seo,
            params,
        }
    }

    /// Suggested download name, e.g. `clickforge-the-10k-wall.png`.
    pub fn file_name(&self) -> String {
        let slug = self.concept.slug();
        if slug.is_empty() {
            format!("clickforge-{}.png", self.id)
        } else {
            format!("clickforge-{slug}.png")
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::thumbnail;
    use super::*;

    #[test]
    fn test_record_layout() {
        let thumb = thumbnail("Launch Day");
        let value = serde_json::to_value(&thumb).unwrap();
        assert!(value["imageUrl"].as_str().unwrap().starts_with("data:image/png"));
        assert!(value["timestamp"].is_i64());
        assert_eq!(value["seo"]["suggestedTitles"][0], "Launch Day (title)");
        assert_eq!(value["params"]["topic"], "Launch Day");
    }

    #[test]
    fn test_file_name_uses_concept_title() {
        let thumb = thumbnail("Launch Day");
        assert_eq!(thumb.file_name(), "clickforge-launch-day.png");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(thumbnail("a").id, thumbnail("a").id);
    }
}
