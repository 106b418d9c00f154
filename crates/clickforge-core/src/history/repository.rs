//! History repository trait.
//!
//! Defines the interface for persisting the vault.

use async_trait::async_trait;

use crate::error::Result;
use crate::thumbnail::Thumbnail;

/// Persistent backing for the vault.
///
/// The whole newest-first list is written on every change; there is no
/// per-entry access at this layer.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Loads the persisted list.
    ///
    /// # Returns
    ///
    /// - `Ok(entries)`: the stored list, or empty if nothing is stored
    /// - `Err(_)`: the stored data exists but could not be read or parsed
    async fn load(&self) -> Result<Vec<Thumbnail>>;

    /// Replaces the persisted list with `entries`.
    async fn save(&self, entries: &[Thumbnail]) -> Result<()>;

    /// Removes the persisted representation entirely.
    ///
    /// Removing something that does not exist is not an error.
    async fn remove(&self) -> Result<()>;
}
