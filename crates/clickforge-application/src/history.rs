//! The history vault: newest-first, bounded, persisted on every change.

use std::sync::Arc;

use clickforge_core::history::{HISTORY_LIMIT, HistoryRepository};
use clickforge_core::{ImageData, Result, Thumbnail};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// In-memory view of the vault backed by a [`HistoryRepository`].
///
/// Mutations are serialized by an internal mutex and return only after the
/// full list has been written.
pub struct HistoryStore {
    repository: Arc<dyn HistoryRepository>,
    entries: Mutex<Vec<Thumbnail>>,
    limit: usize,
}

impl HistoryStore {
    /// Creates an empty store. Call [`HistoryStore::load`] to read persisted entries.
    pub fn new(repository: Arc<dyn HistoryRepository>) -> Self {
        Self {
            repository,
            entries: Mutex::new(Vec::new()),
            limit: HISTORY_LIMIT,
        }
    }

    /// Creates a store and loads whatever is persisted.
    pub async fn open(repository: Arc<dyn HistoryRepository>) -> Self {
        let store = Self::new(repository);
        store.load().await;
        store
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// Unreadable data is logged and treated as an empty vault. Returns the
    /// number of entries loaded.
    pub async fn load(&self) -> usize {
        let mut loaded = match self.repository.load().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "vault could not be read, starting empty");
                Vec::new()
            }
        };
        loaded.truncate(self.limit);
        let count = loaded.len();
        *self.entries.lock().await = loaded;
        debug!(count, "vault loaded");
        count
    }

    /// Puts `result` at the front, evicting the oldest beyond the limit, and persists.
    ///
    /// The in-memory list only changes once the write has succeeded.
    pub async fn append(&self, result: Thumbnail) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let mut updated = Vec::with_capacity(self.limit);
        updated.push(result);
        updated.extend(entries.iter().take(self.limit - 1).cloned());
        if entries.len() >= self.limit {
            debug!(evicted = entries.len() + 1 - self.limit, "vault limit reached");
        }
        self.repository.save(&updated).await?;
        *entries = updated;
        Ok(())
    }

    /// Removes the persisted backing, then empties the in-memory list.
    pub async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().await;
        self.repository.remove().await?;
        let count = entries.len();
        entries.clear();
        info!(count, "vault cleared");
        Ok(())
    }

    /// Swaps the image of the entry with `id`, persisting if it was found.
    pub async fn replace_image(&self, id: &str, image: ImageData) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        let Some(position) = entries.iter().position(|entry| entry.id == id) else {
            debug!(id, "refined result is not in the vault");
            return Ok(false);
        };
        let mut updated = entries.clone();
        updated[position].image = image;
        self.repository.save(&updated).await?;
        *entries = updated;
        Ok(true)
    }

    pub async fn get(&self, id: &str) -> Option<Thumbnail> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    /// Entry at `index`, newest first.
    pub async fn nth(&self, index: usize) -> Option<Thumbnail> {
        self.entries.lock().await.get(index).cloned()
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Vec<Thumbnail> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryRepository, thumbnail};
    use std::sync::atomic::Ordering;

    fn store_with(repo: &Arc<MemoryRepository>) -> HistoryStore {
        HistoryStore::new(repo.clone() as Arc<dyn HistoryRepository>)
    }

    #[tokio::test]
    async fn test_append_is_newest_first_and_persists() {
        let repo = Arc::new(MemoryRepository::default());
        let store = store_with(&repo);
        store.append(thumbnail("first")).await.unwrap();
        store.append(thumbnail("second")).await.unwrap();

        let list = store.list().await;
        assert_eq!(list[0].concept.title, "second");
        assert_eq!(list[1].concept.title, "first");
        assert_eq!(repo.stored().unwrap(), list);
        assert_eq!(repo.save_count(), 2);
    }

    #[tokio::test]
    async fn test_never_exceeds_limit() {
        let repo = Arc::new(MemoryRepository::default());
        let store = store_with(&repo);
        for i in 0..HISTORY_LIMIT {
            store.append(thumbnail(&format!("t{i}"))).await.unwrap();
        }
        assert_eq!(store.len().await, HISTORY_LIMIT);
        let oldest = store.list().await.last().unwrap().id.clone();

        let newest = thumbnail("one more");
        store.append(newest.clone()).await.unwrap();

        let list = store.list().await;
        assert_eq!(list.len(), HISTORY_LIMIT);
        assert_eq!(list[0].id, newest.id);
        assert!(list.iter().all(|entry| entry.id != oldest));
        assert_eq!(repo.stored().unwrap().len(), HISTORY_LIMIT);
    }

    #[tokio::test]
    async fn test_clear_then_load_is_empty() {
        let repo = Arc::new(MemoryRepository::with(vec![thumbnail("a"), thumbnail("b")]));
        let store = HistoryStore::open(repo.clone()).await;
        assert_eq!(store.len().await, 2);

        store.clear().await.unwrap();
        assert!(store.is_empty().await);
        assert!(repo.stored().is_none());

        assert_eq!(store.load().await, 0);
        let reopened = HistoryStore::open(repo).await;
        assert!(reopened.is_empty().await);
    }

    #[tokio::test]
    async fn test_unreadable_vault_loads_empty() {
        let repo = Arc::new(MemoryRepository::with(vec![thumbnail("a")]));
        repo.corrupt.store(true, Ordering::SeqCst);
        let store = HistoryStore::open(repo).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_oversized_vault_is_truncated_on_load() {
        let entries: Vec<_> = (0..HISTORY_LIMIT + 3)
            .map(|i| thumbnail(&format!("t{i}")))
            .collect();
        let store = HistoryStore::open(Arc::new(MemoryRepository::with(entries.clone()))).await;
        assert_eq!(store.len().await, HISTORY_LIMIT);
        assert_eq!(store.nth(0).await.unwrap().id, entries[0].id);
    }

    #[tokio::test]
    async fn test_replace_image_updates_in_place() {
        let repo = Arc::new(MemoryRepository::default());
        let store = store_with(&repo);
        let target = thumbnail("target");
        store.append(target.clone()).await.unwrap();
        store.append(thumbnail("other")).await.unwrap();

        let refined = ImageData::from_base64("image/png", "UkVG");
        assert!(store.replace_image(&target.id, refined.clone()).await.unwrap());

        let updated = store.get(&target.id).await.unwrap();
        assert_eq!(updated.image, refined);
        assert_eq!(updated.timestamp, target.timestamp);
        assert_eq!(store.nth(1).await.unwrap().id, target.id);
        assert_eq!(repo.stored().unwrap()[1].image, refined);

        assert!(!store.replace_image("thumb-missing", refined).await.unwrap());
        assert_eq!(repo.save_count(), 3);
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let repo = Arc::new(MemoryRepository::default());
        let store = store_with(&repo);
        let kept = thumbnail("kept");
        store.append(kept.clone()).await.unwrap();

        repo.fail_saves.store(true, Ordering::SeqCst);
        assert!(store.append(thumbnail("lost")).await.is_err());
        assert!(
            store
                .replace_image(&kept.id, ImageData::from_base64("image/png", "UkVG"))
                .await
                .is_err()
        );

        // memory still matches what is on disk
        assert_eq!(store.list().await, vec![kept.clone()]);
        assert_eq!(repo.stored().unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_failed_clear_keeps_entries() {
        let repo = Arc::new(MemoryRepository::with(vec![thumbnail("a")]));
        let store = HistoryStore::open(repo.clone()).await;
        repo.fail_removes.store(true, Ordering::SeqCst);

        assert!(store.clear().await.is_err());
        assert_eq!(store.len().await, 1);
        assert!(repo.stored().is_some());
    }
}
