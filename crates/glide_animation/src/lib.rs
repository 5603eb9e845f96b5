//! Glide Animation System
//!
//! Frame-driven property tweening with cancelable animations.
//!
//! # Features
//!
//! - **Easing Library**: Penner-style `(t, b, c, d)` curves with exact endpoints
//! - **Animator**: Per-frame interpolation from a start to an end value
//! - **Cancelable Handles**: Idempotent cancel that withdraws the pending frame
//! - **Injectable Scheduling**: Host-driven frame queue, or virtual time for tests
//! - **Presets**: Height, scroll and clip-width tweens

pub mod animator;
pub mod config;
pub mod easing;
pub mod error;
pub mod presets;
pub mod scheduler;

pub use animator::{AnimationHandle, AnimationRequest, AnimationState, Animator};
pub use config::AnimatorConfig;
pub use easing::{Easing, EasingFn};
pub use error::{AnimationError, ConfigError, Result};
pub use presets::TweenPreset;
pub use scheduler::{
    AnimationScheduler, Clock, FrameCallback, FrameRequestId, FrameScheduler, ManualClock,
    SystemClock,
};
