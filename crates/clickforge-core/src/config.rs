//! Configuration models.
//!
//! `RootConfig` lives in `config.toml`; `SecretConfig` in `secret.json`.

use serde::{Deserialize, Serialize};

use crate::error::{ClickforgeError, Result};
use crate::params::GenerationParams;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_STRATEGY_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_SEO_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Connection settings for the Gemini API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeminiSettings {
    pub base_url: String,
    /// Model used for trend research and concept brainstorming.
    pub strategy_model: String,
    /// Model used for titles and tags.
    pub seo_model: String,
    /// Model used for rendering and refinement.
    pub image_model: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Ground brainstorming in Google Search results.
    pub google_search: bool,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            strategy_model: DEFAULT_STRATEGY_MODEL.to_string(),
            seo_model: DEFAULT_SEO_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout_secs: 120,
            google_search: true,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StudioSettings {
    /// Number of concepts requested per brainstorm.
    pub concept_count: usize,
    pub seo_title_count: usize,
    pub seo_tag_count: usize,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            concept_count: 3,
            seo_title_count: 5,
            seo_tag_count: 10,
        }
    }
}

impl StudioSettings {
    /// Rejects settings that would make brainstorming return nothing.
    pub fn validate(&self) -> Result<()> {
        if self.concept_count == 0 {
            return Err(ClickforgeError::config(
                "[studio] concept_count must be at least 1",
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RootConfig {
    pub gemini: GeminiSettings,
    pub studio: StudioSettings,
    /// Initial values for the setup form.
    pub defaults: GenerationParams,
}

impl RootConfig {
    pub fn validate(&self) -> Result<()> {
        self.studio.validate()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

impl SecretConfig {
    /// The Gemini key, if one is configured and non-empty.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|g| g.api_key.trim())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            [gemini]
            timeout_secs = 30

            [defaults]
            style = "Gritty"
            aspectRatio = "9:16"
            "#,
        )
        .unwrap();
        assert_eq!(config.gemini.timeout_secs, 30);
        assert_eq!(config.gemini.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.studio.concept_count, 3);
        assert_eq!(config.defaults.style, "Gritty");
        assert_eq!(config.defaults.aspect_ratio, crate::params::AspectRatio::Portrait);
        assert_eq!(config.defaults.lighting, "Cinematic");
    }

    #[test]
    fn test_zero_concept_count_is_rejected() {
        let config: RootConfig = toml::from_str("[studio]\nconcept_count = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ClickforgeError::Config(_)));
        assert!(err.to_string().contains("concept_count"));
        assert!(RootConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_key_is_treated_as_missing() {
        let secrets = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "  ".to_string(),
            }),
        };
        assert!(secrets.gemini_api_key().is_none());
        assert!(SecretConfig::default().gemini_api_key().is_none());
    }
}
