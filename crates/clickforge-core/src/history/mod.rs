//! Vault of previously rendered thumbnails.

pub mod repository;

pub use repository::HistoryRepository;

/// Maximum number of results kept in the vault.
pub const HISTORY_LIMIT: usize = 20;

/// Storage key the vault is persisted under.
pub const HISTORY_STORAGE_KEY: &str = "clickforge_v2_history";
