//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`, writing a default file on
//! first run so users have something to edit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clickforge_core::Result;
use clickforge_core::config::RootConfig;
use tokio::sync::RwLock;
use tracing::info;

use crate::paths::ClickforgePaths;
use crate::storage::AtomicFile;

/// Configuration service that loads and caches the root configuration.
#[derive(Clone)]
pub struct ConfigService {
    config: Arc<RwLock<Option<RootConfig>>>,
    file: Arc<AtomicFile<RootConfig>>,
}

impl ConfigService {
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = ClickforgePaths::new(base_path).config_file()?;
        Ok(Self::at(path))
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            file: Arc::new(AtomicFile::toml(path)),
        }
    }

    pub fn config_path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing file is created with defaults. A malformed or invalid file is
    /// an error and is left untouched.
    pub async fn get_config(&self) -> Result<RootConfig> {
        if let Some(cached) = self.config.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = self.load_or_create().await?;
        *self.config.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        *self.config.write().await = None;
    }

    async fn load_or_create(&self) -> Result<RootConfig> {
        let file = Arc::clone(&self.file);
        let config = tokio::task::spawn_blocking(move || match file.load()? {
            Some(config) => Ok::<_, crate::storage::AtomicFileError>((config, false)),
            None => {
                let config = RootConfig::default();
                file.save(&config)?;
                Ok((config, true))
            }
        })
        .await??;

        let (config, created) = config;
        config.validate()?;
        if created {
            info!(path = %self.config_path().display(), "wrote default configuration");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clickforge_core::AspectRatio;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_default_config() {
        let temp = TempDir::new().unwrap();
        let service = ConfigService::new(Some(temp.path())).unwrap();
        let config = service.get_config().await.unwrap();
        assert_eq!(config, RootConfig::default());
        assert!(service.config_path().exists());

        // the written file parses back to the same configuration
        let reloaded = ConfigService::new(Some(temp.path())).unwrap();
        assert_eq!(reloaded.get_config().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_reads_existing_config_and_caches() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[studio]\nconcept_count = 4\n\n[defaults]\naspectRatio = \"1:1\"\n",
        )
        .unwrap();
        let service = ConfigService::at(path.clone());
        let config = service.get_config().await.unwrap();
        assert_eq!(config.studio.concept_count, 4);
        assert_eq!(config.defaults.aspect_ratio, AspectRatio::Square);

        std::fs::write(&path, "[studio]\nconcept_count = 2\n").unwrap();
        assert_eq!(service.get_config().await.unwrap().studio.concept_count, 4);
        service.invalidate_cache().await;
        assert_eq!(service.get_config().await.unwrap().studio.concept_count, 2);
    }

    #[tokio::test]
    async fn test_zero_concept_count_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[studio]\nconcept_count = 0\n").unwrap();
        let service = ConfigService::at(path);
        let err = service.get_config().await.unwrap_err();
        assert!(err.to_string().contains("concept_count"));
    }

    #[tokio::test]
    async fn test_malformed_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[studio\nconcept_count = ").unwrap();
        let service = ConfigService::at(path);
        assert!(service.get_config().await.is_err());
    }
}
