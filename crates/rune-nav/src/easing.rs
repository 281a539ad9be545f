//! Easing curves for show/hide transition timing.
//!
//! The named curves follow the CSS timing functions so transition settings in
//! `rune.toml` read the same as stylesheet transitions (`ease-out`, ...).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maps linear progress in `[0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    /// Custom curve; x control values are clamped into `[0, 1]`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Ease
    }
}

impl EasingFunction {
    /// Eased progress for linear progress `t` (clamped to `[0, 1]`).
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let (x1, y1, x2, y2) = match *self {
            Self::Linear => return t,
            Self::Ease => (0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                (x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2)
            }
        };
        bezier_at(x1, y1, x2, y2, t)
    }
}

/// Error returned when an easing name is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown easing '{0}'")]
pub struct UnknownEasing(pub String);

impl FromStr for EasingFunction {
    type Err = UnknownEasing;

    /// Parse a CSS timing-function keyword (`linear`, `ease`, `ease-in`,
    /// `ease-out`, `ease-in-out`). Underscores are accepted for dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Ok(Self::Linear),
            "ease" => Ok(Self::Ease),
            "ease-in" => Ok(Self::EaseIn),
            "ease-out" => Ok(Self::EaseOut),
            "ease-in-out" => Ok(Self::EaseInOut),
            _ => Err(UnknownEasing(s.to_string())),
        }
    }
}

fn bezier_at(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    // Newton-Raphson on x(t) = progress, falling back to bisection when the
    // slope flattens out.
    let mut t = progress;
    for _ in 0..8 {
        let err = component(x1, x2, t) - progress;
        if err.abs() < 1e-6 {
            return component(y1, y2, t);
        }
        let dx = slope(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - err / dx).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    for _ in 0..32 {
        let x = component(x1, x2, t);
        if (x - progress).abs() < 1e-6 {
            break;
        }
        if x < progress {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    component(y1, y2, t)
}

/// One coordinate of a unit cubic bezier with end points 0 and 1.
#[inline]
fn component(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn slope(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}
