//! Property tween presets
//!
//! Request builders for the element properties the animator is usually
//! pointed at: an element's height, a scroll offset, and the width of a
//! clipped text wrapper.

use crate::animator::{check_params, AnimationHandle, AnimationRequest, Animator};
use crate::easing::Easing;
use crate::error::Result;

/// The visual property a tween drives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenPreset {
    /// Element height in whole pixels
    Height,
    /// Scroll offset of a container
    Scroll,
    /// Width of a clipped text wrapper
    Width,
}

impl TweenPreset {
    /// Curve used when the caller does not pick one
    pub fn default_easing(&self) -> Easing {
        match self {
            TweenPreset::Height => Easing::Linear,
            TweenPreset::Scroll => Easing::EaseInOutQuad,
            TweenPreset::Width => Easing::EaseInOutQuart,
        }
    }

    /// Whether the sink receives the exact start value before the first frame
    pub fn primes_start(&self) -> bool {
        matches!(self, TweenPreset::Height | TweenPreset::Width)
    }

    /// Build a request for this property.
    ///
    /// A height tween without an explicit curve reports values truncated to
    /// whole pixels.
    pub fn request(
        self,
        start: f64,
        end: f64,
        duration_ms: f64,
        easing: Option<Easing>,
        mut sink: impl FnMut(f64) + 'static,
    ) -> AnimationRequest {
        let request = match (self, easing) {
            (TweenPreset::Height, None) => {
                AnimationRequest::new(start, end, duration_ms, move |v: f64| sink(v.trunc()))
            }
            _ => AnimationRequest::new(start, end, duration_ms, sink),
        };
        request.with_easing(easing.unwrap_or_else(|| self.default_easing()))
    }
}

impl Animator {
    /// Start a preset tween; see [`TweenPreset::request`]
    pub fn tween(
        &self,
        preset: TweenPreset,
        start: f64,
        end: f64,
        duration_ms: f64,
        easing: Option<Easing>,
        mut sink: impl FnMut(f64) + 'static,
    ) -> Result<AnimationHandle> {
        check_params(start, end, duration_ms)?;
        // The prime bypasses whole-pixel truncation
        if preset.primes_start() {
            sink(start);
        }
        tracing::debug!("Starting {:?} tween", preset);
        self.animate(preset.request(start, end, duration_ms, easing, sink))
    }

    /// Smooth-scroll from `from` to `to` over the configured scroll duration
    pub fn scroll_to(
        &self,
        from: f64,
        to: f64,
        sink: impl FnMut(f64) + 'static,
    ) -> Result<AnimationHandle> {
        let duration_ms = self.config().scroll_duration_ms;
        self.tween(TweenPreset::Scroll, from, to, duration_ms, None, sink)
    }
}
