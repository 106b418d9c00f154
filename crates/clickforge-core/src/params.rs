//! Generation parameters collected during setup.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{ClickforgeError, Result};

/// Output aspect ratios supported by the image model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    #[strum(serialize = "4:3")]
    Classic,
}

impl AspectRatio {
    /// Wire value expected by the image model (`"16:9"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Classic => "4:3",
        }
    }

    /// Parses a user supplied ratio, reporting the accepted values on failure.
    pub fn parse(value: &str) -> Result<Self> {
        value.trim().parse().map_err(|_| {
            let accepted: Vec<&str> = AspectRatio::iter().map(|r| r.as_str()).collect();
            ClickforgeError::invalid_input(format!(
                "unsupported aspect ratio '{value}', expected one of {}",
                accepted.join(", ")
            ))
        })
    }
}

pub const GOAL_PRESETS: &[&str] = &["Educational", "Entertainment", "Drama", "Case Study"];
pub const STYLE_PRESETS: &[&str] = &["Professional", "Vibrant", "Minimal", "Gritty"];
pub const LIGHTING_PRESETS: &[&str] = &["Cinematic", "Neon", "Natural", "Moody"];
pub const ANGLE_PRESETS: &[&str] = &["Eye-level", "Wide", "Close-up", "Isometric"];

/// Everything the user configures before brainstorming.
///
/// The live copy is edited freely; results hold their own clone taken when
/// generation started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationParams {
    pub topic: String,
    pub style: String,
    pub audience: String,
    pub goal: String,
    pub aspect_ratio: AspectRatio,
    pub lighting: String,
    pub angle: String,
    #[serde(rename = "isViralMode")]
    pub viral_mode: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            topic: String::new(),
            style: "Professional".to_string(),
            audience: "General Interest".to_string(),
            goal: "Educational".to_string(),
            aspect_ratio: AspectRatio::default(),
            lighting: "Cinematic".to_string(),
            angle: "Eye-level".to_string(),
            viral_mode: false,
        }
    }
}

/// Fields of [`GenerationParams`] that can be edited by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ParamField {
    Topic,
    Style,
    Audience,
    Goal,
    Ratio,
    Lighting,
    Angle,
    Viral,
}

impl ParamField {
    /// Suggested values for the field, if it has a preset list.
    pub fn presets(&self) -> &'static [&'static str] {
        match self {
            ParamField::Goal => GOAL_PRESETS,
            ParamField::Style => STYLE_PRESETS,
            ParamField::Lighting => LIGHTING_PRESETS,
            ParamField::Angle => ANGLE_PRESETS,
            ParamField::Ratio => &["16:9", "9:16", "1:1", "4:3"],
            ParamField::Viral => &["on", "off"],
            ParamField::Topic | ParamField::Audience => &[],
        }
    }
}

impl GenerationParams {
    /// True when brainstorming may start.
    pub fn has_topic(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    /// Assigns `value` to the named field.
    pub fn set_field(&mut self, field: ParamField, value: &str) -> Result<()> {
        let value = value.trim();
        match field {
            ParamField::Topic => self.topic = value.to_string(),
            ParamField::Style => self.style = value.to_string(),
            ParamField::Audience => self.audience = value.to_string(),
            ParamField::Goal => self.goal = value.to_string(),
            ParamField::Lighting => self.lighting = value.to_string(),
            ParamField::Angle => self.angle = value.to_string(),
            ParamField::Ratio => self.aspect_ratio = AspectRatio::parse(value)?,
            ParamField::Viral => {
                self.viral_mode = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" | "1" => true,
                    "off" | "false" | "no" | "0" => false,
                    other => {
                        return Err(ClickforgeError::invalid_input(format!(
                            "viral mode expects on/off, got '{other}'"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
