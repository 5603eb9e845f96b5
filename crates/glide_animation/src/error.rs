//! Animation error types

use thiserror::Error;

/// Errors raised synchronously when an animation request is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Duration was zero, negative or not finite
    #[error("Animation duration must be a finite value > 0, got {0}")]
    InvalidDuration(f64),

    /// A start or end value was NaN or infinite
    #[error("Animation {field} value must be finite, got {value}")]
    NonFiniteValue { field: &'static str, value: f64 },
}

/// Errors raised while loading animator configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read animator config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse animator config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown easing curve: {0}")]
    UnknownEasing(String),

    #[error("Config field `{field}` must be a finite value > 0, got {value}")]
    InvalidDuration { field: &'static str, value: f64 },
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
