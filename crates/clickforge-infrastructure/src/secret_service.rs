//! Secret service implementation.
//!
//! The Gemini key comes from the environment (`GEMINI_API_KEY`, then
//! `API_KEY`) and falls back to `secret.json` in the config directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clickforge_core::config::{GeminiConfig, SecretConfig};
use clickforge_core::secret::SecretService;
use clickforge_core::{ClickforgeError, Result};
use tokio::sync::RwLock;
use tracing::debug;

use crate::paths::ClickforgePaths;
use crate::storage::AtomicFile;

/// Environment variables consulted for the key, in priority order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var(name).ok(),
            EnvSource::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

/// Service for resolving the API credential.
///
/// The resolved configuration is cached after the first load.
#[derive(Clone)]
pub struct SecretServiceImpl {
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    file: Arc<AtomicFile<SecretConfig>>,
    env: EnvSource,
}

impl SecretServiceImpl {
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = ClickforgePaths::new(base_path).secret_file()?;
        Ok(Self::at(path))
    }

    /// Reads secrets from an explicit file.
    pub fn at(path: PathBuf) -> Self {
        Self {
            secrets: Arc::new(RwLock::new(None)),
            file: Arc::new(AtomicFile::json(path)),
            env: EnvSource::Process,
        }
    }

    /// Replaces the process environment with a fixed set of variables.
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = EnvSource::Fixed(vars);
        self
    }

    pub fn secret_path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the Gemini key or a security error telling the user where to put it.
    pub async fn require_gemini_key(&self) -> Result<String> {
        let secrets = self.load_secrets().await?;
        secrets
            .gemini_api_key()
            .map(str::to_string)
            .ok_or_else(|| {
                ClickforgeError::security(format!(
                    "no Gemini API key found; set GEMINI_API_KEY or fill in {}",
                    self.secret_path().display()
                ))
            })
    }

    fn from_env(&self) -> Option<SecretConfig> {
        API_KEY_ENV_VARS.iter().find_map(|name| {
            let value = self.env.get(name)?;
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            debug!(source = name, "using API key from environment");
            Some(SecretConfig {
                gemini: Some(GeminiConfig {
                    api_key: value.to_string(),
                }),
            })
        })
    }

    async fn resolve(&self) -> Result<SecretConfig> {
        if let Some(config) = self.from_env() {
            return Ok(config);
        }
        let file = Arc::clone(&self.file);
        let loaded = tokio::task::spawn_blocking(move || file.load()).await??;
        if loaded.is_some() {
            debug!(path = %self.secret_path().display(), "using API key from secret file");
        }
        Ok(loaded.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        if let Some(cached) = self.secrets.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = self.resolve().await?;
        *self.secrets.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn secret_file_exists(&self) -> bool {
        self.secret_path().exists()
    }
}
