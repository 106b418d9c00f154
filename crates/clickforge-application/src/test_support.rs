//! Hand-written doubles shared by the unit tests.

use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use clickforge_core::concept::ConceptDraft;
use clickforge_core::history::HistoryRepository;
use clickforge_core::{
    ClickforgeError, Concept, GenerationParams, ImageData, Result, SeoBundle, Thumbnail,
};

pub fn concept(title: &str) -> Concept {
    Concept::from_draft(ConceptDraft {
        title: title.to_string(),
        description: format!("{title} description"),
        visual_prompt: format!("{title} visual"),
        overlay_text: "10K?".to_string(),
        overlay_variants: vec!["STUCK".to_string()],
        psychology: "curiosity gap".to_string(),
        color_palette: vec!["#FF0000".to_string()],
        audience_sentiment: vec![],
    })
}

pub fn thumbnail(title: &str) -> Thumbnail {
    Thumbnail::new(
        ImageData::from_base64("image/png", "QUJD"),
        concept(title),
        SeoBundle::default(),
        GenerationParams {
            topic: title.to_string(),
            ..Default::default()
        },
    )
}

/// In-memory repository that records writes and can be told to fail.
#[derive(Default)]
pub struct MemoryRepository {
    pub stored: StdMutex<Option<Vec<Thumbnail>>>,
    pub saves: StdMutex<usize>,
    pub corrupt: AtomicBool,
    pub fail_saves: AtomicBool,
    pub fail_removes: AtomicBool,
}

impl MemoryRepository {
    pub fn with(entries: Vec<Thumbnail>) -> Self {
        let repo = Self::default();
        *repo.stored.lock().unwrap() = Some(entries);
        repo
    }

    pub fn stored(&self) -> Option<Vec<Thumbnail>> {
        self.stored.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl HistoryRepository for MemoryRepository {
    async fn load(&self) -> Result<Vec<Thumbnail>> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(ClickforgeError::Serialization {
                format: "JSON".into(),
                message: "expected value at line 1".into(),
            });
        }
        Ok(self.stored().unwrap_or_default())
    }

    async fn save(&self, entries: &[Thumbnail]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ClickforgeError::io("disk full"));
        }
        *self.saves.lock().unwrap() += 1;
        *self.stored.lock().unwrap() = Some(entries.to_vec());
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(ClickforgeError::io("permission denied"));
        }
        *self.stored.lock().unwrap() = None;
        Ok(())
    }
}
