//! Unified path management for clickforge files.
//!
//! Configuration and secrets live in the platform config directory, the vault
//! and exports in the platform data directory. A base directory can replace
//! both, which is what `--data-dir` and the tests use.

use std::path::{Path, PathBuf};

use clickforge_core::config::{GeminiConfig, SecretConfig};
use clickforge_core::history::HISTORY_STORAGE_KEY;

const APP_DIR: &str = "clickforge";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for clickforge_core::ClickforgeError {
    fn from(err: PathError) -> Self {
        clickforge_core::ClickforgeError::config(err.to_string())
    }
}

/// Path resolution for clickforge.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/clickforge/            # Config directory
/// ├── config.toml                  # Models, timeouts, setup defaults
/// ├── secret.json                  # Gemini API key
/// └── logs/                        # Application logs
///     └── clickforge.log.YYYY-MM-DD
///
/// ~/.local/share/clickforge/       # Data directory
/// ├── clickforge_v2_history.json   # The vault
/// └── exports/                     # Downloaded thumbnails
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClickforgePaths {
    base: Option<PathBuf>,
}

impl ClickforgePaths {
    /// Creates a resolver. With `base`, every directory resolves to it.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the clickforge configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the clickforge data directory.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// File backing the vault, named after its storage key.
    pub fn history_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join(format!("{HISTORY_STORAGE_KEY}.json")))
    }

    pub fn exports_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("exports"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    /// Ensures the secret file exists, creating an empty template if it doesn't.
    ///
    /// The template is written with permissions 600 on Unix.
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template_config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
            }),
        };
        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
