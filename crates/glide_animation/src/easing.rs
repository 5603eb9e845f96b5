//! Easing functions for animations
//!
//! Curves use the `(t, b, c, d)` form: elapsed time `t`, start value `b`,
//! change in value `c` and duration `d`. Every library curve returns `b` at
//! `t == 0` and `b + c` at `t == d`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Signature of a `(t, b, c, d)` easing curve
pub type EasingFn = fn(f64, f64, f64, f64) -> f64;

/// Easing function type
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseOutElastic,
    /// Caller-supplied curve with the same boundary contract
    Custom(EasingFn),
}

impl Easing {
    /// All built-in curves, in declaration order
    pub const LIBRARY: [Easing; 8] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseOutElastic,
    ];

    /// Evaluate the curve at elapsed time `t` of a transition from `b` by `c` over `d`
    pub fn value(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        let curve: EasingFn = match self {
            Easing::Linear => linear,
            Easing::EaseInQuad => ease_in_quad,
            Easing::EaseOutQuad => ease_out_quad,
            Easing::EaseInOutQuad => ease_in_out_quad,
            Easing::EaseInQuart => ease_in_quart,
            Easing::EaseOutQuart => ease_out_quart,
            Easing::EaseInOutQuart => ease_in_out_quart,
            Easing::EaseOutElastic => ease_out_elastic,
            Easing::Custom(f) => *f,
        };
        curve(t, b, c, d)
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, progress: f64) -> f64 {
        self.value(progress.clamp(0.0, 1.0), 0.0, 1.0, 1.0)
    }

    /// Canonical name, as accepted by [`Easing::by_name`]
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseOutElastic => "easeOutElastic",
            Easing::Custom(_) => "custom",
        }
    }

    /// Look up a built-in curve by camelCase or kebab-case name
    pub fn by_name(name: &str) -> Option<Easing> {
        let easing = match name.trim() {
            "linear" => Easing::Linear,
            "easeInQuad" | "ease-in-quad" => Easing::EaseInQuad,
            "easeOutQuad" | "ease-out-quad" => Easing::EaseOutQuad,
            "easeInOutQuad" | "ease-in-out-quad" => Easing::EaseInOutQuad,
            "easeInQuart" | "ease-in-quart" => Easing::EaseInQuart,
            "easeOutQuart" | "ease-out-quart" => Easing::EaseOutQuart,
            "easeInOutQuart" | "ease-in-out-quart" => Easing::EaseInOutQuart,
            "easeOutElastic" | "ease-out-elastic" | "elastic-out" => Easing::EaseOutElastic,
            _ => return None,
        };
        Some(easing)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::by_name(s).ok_or_else(|| ConfigError::UnknownEasing(s.to_string()))
    }
}

pub fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * t / d + b
}

pub fn ease_in_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t + b
}

pub fn ease_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

pub fn ease_in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    let t = t - 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

pub fn ease_in_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t * t * t + b
}

pub fn ease_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    -c * (t * t * t * t - 1.0) + b
}

pub fn ease_in_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t * t * t + b;
    }
    let t = t - 2.0;
    -c / 2.0 * (t * t * t * t - 2.0) + b
}

/// Elastic ease-out with a period of `0.7 * d`.
///
/// The phase shift is recomputed when the amplitude is smaller than the
/// delta; an amplitude exactly equal to the delta takes the `asin` branch.
pub fn ease_out_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    // asin(c / a) below would be 0 / 0
    if c == 0.0 {
        return b;
    }

    let mut p = d * 0.7;
    if p == 0.0 {
        p = d * 0.3;
    }
    let mut a = c;
    let s = if a < c.abs() {
        a = c;
        p / 4.0
    } else {
        p / (2.0 * PI) * (c / a).asin()
    };

    a * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_library_boundaries() {
        let cases = [(0.0, 100.0, 300.0), (10.0, -25.0, 200.0), (-5.0, 3.5, 1.0)];
        for easing in Easing::LIBRARY {
            for (b, c, d) in cases {
                let start = easing.value(0.0, b, c, d);
                let end = easing.value(d, b, c, d);
                assert!((start - b).abs() < EPS, "{easing} at t=0 gave {start}");
                assert!((end - (b + c)).abs() < EPS, "{easing} at t=d gave {end}");
            }
        }
    }

    #[test]
    fn test_linear_midpoint() {
        assert!((Easing::Linear.value(150.0, 0.0, 100.0, 300.0) - 50.0).abs() < EPS);
    }

    #[test]
    fn test_in_out_curves_cross_midpoint() {
        for easing in [Easing::EaseInOutQuad, Easing::EaseInOutQuart] {
            assert!((easing.value(100.0, 0.0, 10.0, 200.0) - 5.0).abs() < EPS);
        }
    }

    #[test]
    fn test_ease_in_lags_ease_out_leads() {
        let t = 0.25;
        assert!(Easing::EaseInQuad.apply(t) < t);
        assert!(Easing::EaseOutQuad.apply(t) > t);
        assert!(Easing::EaseInQuart.apply(t) < Easing::EaseInQuad.apply(t));
        assert!(Easing::EaseOutQuart.apply(t) > Easing::EaseOutQuad.apply(t));
    }

    #[test]
    fn test_elastic_overshoots() {
        let peak = (1..100)
            .map(|i| ease_out_elastic(i as f64, 0.0, 100.0, 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 100.0);
    }

    #[test]
    fn test_elastic_negative_delta() {
        // a < |c| branch
        assert_eq!(ease_out_elastic(0.0, 50.0, -50.0, 400.0), 50.0);
        assert_eq!(ease_out_elastic(400.0, 50.0, -50.0, 400.0), 0.0);
        assert!(ease_out_elastic(200.0, 50.0, -50.0, 400.0).is_finite());
    }

    #[test]
    fn test_elastic_zero_delta() {
        for t in [0.0, 1.0, 50.0, 99.0, 100.0] {
            assert_eq!(ease_out_elastic(t, 0.0, 0.0, 100.0), 0.0);
        }
    }

    #[test]
    fn test_apply_clamps_progress() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn test_custom_curve() {
        fn step(t: f64, b: f64, c: f64, d: f64) -> f64 {
            if t < d {
                b
            } else {
                b + c
            }
        }
        let easing = Easing::Custom(step);
        assert_eq!(easing.value(10.0, 1.0, 2.0, 20.0), 1.0);
        assert_eq!(easing.value(20.0, 1.0, 2.0, 20.0), 3.0);
        assert_eq!(easing.name(), "custom");
    }

    #[test]
    fn test_by_name() {
        for easing in Easing::LIBRARY {
            assert_eq!(Easing::by_name(easing.name()).map(|e| e.name()), Some(easing.name()));
        }
        assert!(matches!(
            Easing::by_name("ease-in-out-quart"),
            Some(Easing::EaseInOutQuart)
        ));
        assert!(matches!(
            "bounce".parse::<Easing>(),
            Err(ConfigError::UnknownEasing(name)) if name == "bounce"
        ));
    }
}
