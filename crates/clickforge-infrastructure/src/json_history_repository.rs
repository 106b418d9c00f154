//! JSON file implementation of [`HistoryRepository`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use clickforge_core::history::HistoryRepository;
use clickforge_core::{ClickforgeError, Result, Thumbnail};
use tracing::{debug, warn};

use crate::paths::ClickforgePaths;
use crate::storage::AtomicFile;

/// Stores the vault as a single JSON array, newest first.
///
/// File I/O is blocking, so every call is moved onto the blocking pool.
#[derive(Clone)]
pub struct JsonHistoryRepository {
    file: Arc<AtomicFile<Vec<Thumbnail>>>,
}

impl JsonHistoryRepository {
    /// Opens the repository at the default (or `base` overridden) location.
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let path = ClickforgePaths::new(base).history_file()?;
        Ok(Self::at(path))
    }

    /// Opens the repository backed by an explicit file.
    pub fn at(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::json(path)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn load(&self) -> Result<Vec<Thumbnail>> {
        let file = Arc::clone(&self.file);
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await?
            .map_err(|err| {
                if err.is_corrupt() {
                    warn!(
                        path = %self.path().display(),
                        error = %err,
                        "vault file is corrupt"
                    );
                }
                ClickforgeError::from(err)
            })?;
        let entries = loaded.unwrap_or_default();
        debug!(count = entries.len(), path = %self.path().display(), "loaded vault");
        Ok(entries)
    }

    async fn save(&self, entries: &[Thumbnail]) -> Result<()> {
        let file = Arc::clone(&self.file);
        let entries = entries.to_vec();
        tokio::task::spawn_blocking(move || file.save(&entries)).await??;
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.remove()).await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clickforge_core::concept::{Concept, ConceptDraft};
    use clickforge_core::{AspectRatio, AudienceSentiment, GenerationParams, ImageData, SeoBundle};
    use tempfile::TempDir;

    fn thumbnail(title: &str) -> Thumbnail {
        let concept = Concept::from_draft(ConceptDraft {
            title: title.to_string(),
            description: "Founder stares down a wall of churn".into(),
            visual_prompt: "close-up founder, red graph crashing behind".into(),
            overlay_text: "10K OR BUST".into(),
            overlay_variants: vec!["STUCK AT 9K?".into(), "THE 10K WALL".into()],
            psychology: "curiosity".into(),
            color_palette: vec!["#FF0000".into(), "#FFFF00".into(), "#000000".into()],
            audience_sentiment: vec![
                AudienceSentiment {
                    segment: "Founders".into(),
                    reaction: "Must click".into(),
                },
                AudienceSentiment {
                    segment: "Investors".into(),
                    reaction: "Curious".into(),
                },
            ],
        });
        let seo = SeoBundle {
            suggested_titles: vec![
                "How I broke the $10k MRR wall".into(),
                "Scaling a SaaS: the honest numbers".into(),
            ],
            tags: vec!["saas".into(), "mrr".into(), "bootstrapping".into()],
        };
        let params = GenerationParams {
            topic: "Scaling a SaaS to $10k MRR".into(),
            style: "Gritty".into(),
            audience: "Indie hackers".into(),
            goal: "Curiosity".into(),
            aspect_ratio: AspectRatio::Portrait,
            lighting: "Neon".into(),
            angle: "Low angle".into(),
            viral_mode: true,
        };
        Thumbnail::new(ImageData::from_base64("image/png", "QUJD"), concept, seo, params)
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let repo = JsonHistoryRepository::new(Some(temp.path())).unwrap();
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_preserves_order() {
        let temp = TempDir::new().unwrap();
        let repo = JsonHistoryRepository::new(Some(temp.path())).unwrap();
        let entries = vec![thumbnail("newest"), thumbnail("older")];
        repo.save(&entries).await.unwrap();

        let reopened = JsonHistoryRepository::new(Some(temp.path())).unwrap();
        let loaded = reopened.load().await.unwrap();
        assert_eq!(loaded, entries);
        assert_eq!(loaded[0].concept.overlay_variants.len(), 2);
        assert_eq!(loaded[0].concept.audience_sentiment[1].segment, "Investors");
        assert_eq!(loaded[0].seo.tags, vec!["saas", "mrr", "bootstrapping"]);
        assert_eq!(loaded[0].params.aspect_ratio, AspectRatio::Portrait);
        assert!(loaded[0].params.viral_mode);
        assert!(repo.path().ends_with("clickforge_v2_history.json"));
    }

    #[tokio::test]
    async fn test_remove_deletes_file() {
        let temp = TempDir::new().unwrap();
        let repo = JsonHistoryRepository::new(Some(temp.path())).unwrap();
        repo.save(&[thumbnail("a")]).await.unwrap();
        repo.remove().await.unwrap();
        assert!(!repo.path().exists());
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let repo = JsonHistoryRepository::new(Some(temp.path())).unwrap();
        std::fs::write(repo.path(), "[{\"id\": 1").unwrap();
        let err = repo.load().await.unwrap_err();
        assert!(err.is_serialization());
        // a failed load never rewrites the file
        assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), "[{\"id\": 1");
    }
}
