//! Animator configuration (glide.toml)

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

use crate::easing::Easing;
use crate::error::ConfigError;

/// Animator-wide settings
#[derive(Debug, Clone, Deserialize)]
pub struct AnimatorConfig {
    /// Finish every animation on its first frame
    #[serde(default)]
    pub reduced_motion: bool,
    /// Duration used by [`crate::Animator::scroll_to`]
    #[serde(default = "default_scroll_duration")]
    pub scroll_duration_ms: f64,
    /// Curve used by requests that do not pick one
    #[serde(default, deserialize_with = "deserialize_easing")]
    pub default_easing: Easing,
}

fn default_scroll_duration() -> f64 {
    300.0
}

fn deserialize_easing<'de, D>(deserializer: D) -> Result<Easing, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            scroll_duration_ms: default_scroll_duration(),
            default_easing: Easing::default(),
        }
    }
}

impl AnimatorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AnimatorConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded animator config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scroll_duration_ms.is_finite() && self.scroll_duration_ms > 0.0) {
            return Err(ConfigError::InvalidDuration {
                field: "scroll_duration_ms",
                value: self.scroll_duration_ms,
            });
        }
        Ok(())
    }

    /// Builder: set reduced motion
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    /// Builder: set the scroll duration
    pub fn with_scroll_duration(mut self, duration_ms: f64) -> Self {
        self.scroll_duration_ms = duration_ms;
        self
    }

    /// Builder: set the fallback easing curve
    pub fn with_default_easing(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        self
    }
}
