//! Fooocus generation parameters and the queue payload built from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Style used when the user does not pick one.
pub const DEFAULT_STYLE: &str = "cinematic-default";
/// Aspect ratio used when the user does not pick one.
pub const DEFAULT_ASPECT_RATIO: &str = "1024x1024";

/// Fooocus performance preset, shown to users as the generation "mode".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performance {
    #[default]
    Speed,
    Quality,
}

impl Performance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "Speed",
            Self::Quality => "Quality",
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Performance {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "speed" => Ok(Self::Speed),
            "quality" => Ok(Self::Quality),
            other => Err(CoreError::Validation(format!(
                "Invalid mode '{other}'. Must be one of: Speed, Quality"
            ))),
        }
    }
}

/// Everything a user chose for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub prompt: String,
    pub style: String,
    pub mode: Performance,
    /// `WIDTHxHEIGHT`, as listed in the aspect-ratio catalog.
    pub aspect_ratio: String,
}

impl GenerationOptions {
    /// Options for `prompt` with every other parameter at its default.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: DEFAULT_STYLE.to_string(),
            mode: Performance::default(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_mode(mut self, mode: Performance) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    /// JSON body submitted to the Fooocus queue.
    ///
    /// The model spells aspect ratios with a multiplication sign
    /// (`1024×1024`), so the catalog's `x` is swapped out here.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "prompt": self.prompt,
            "style": self.style,
            "performance": self.mode.as_str(),
            "aspect_ratio": self.aspect_ratio.replace('x', "×"),
        })
    }
}
