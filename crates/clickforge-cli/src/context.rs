//! Wiring of services shared by every command.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clickforge_application::HistoryStore;
use clickforge_core::StudioService;
use clickforge_core::config::RootConfig;
use clickforge_infrastructure::{
    ClickforgePaths, ConfigService, JsonHistoryRepository, SecretServiceImpl,
};
use clickforge_interaction::GeminiStudio;
use tracing::info;

pub struct AppContext {
    pub paths: ClickforgePaths,
    pub config: RootConfig,
    pub history: Arc<HistoryStore>,
    secrets: SecretServiceImpl,
}

impl AppContext {
    /// Loads configuration and the vault. Does not touch credentials.
    pub async fn load(base: Option<&Path>) -> Result<Self> {
        let paths = ClickforgePaths::new(base);
        let config = ConfigService::new(base)?
            .get_config()
            .await
            .context("failed to load config.toml")?;
        let repository = Arc::new(JsonHistoryRepository::new(base)?);
        let history = Arc::new(HistoryStore::open(repository).await);
        let secrets = SecretServiceImpl::new(base)?;

        Ok(Self {
            paths,
            config,
            history,
            secrets,
        })
    }

    /// Builds the Gemini collaborator, creating a secret template if no key is found.
    pub async fn studio(&self) -> Result<Arc<dyn StudioService>> {
        let key = match self.secrets.require_gemini_key().await {
            Ok(key) => key,
            Err(err) => {
                let template = self.paths.ensure_secret_file()?;
                info!(path = %template.display(), "secret template ready");
                return Err(err.into());
            }
        };
        Ok(Arc::new(GeminiStudio::new(key, &self.config)?))
    }
}
