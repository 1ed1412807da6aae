//! Pure easing functions
//!
//! Maps a linear progress value in [0, 1] onto an eased progress value in
//! [0, 1]. Used by the counter driver, the reveal transition and the TUI's
//! smooth page scroll.

use serde::{Deserialize, Serialize};

/// Easing curve selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// Jump straight to the end value
    None,
    Linear,
    /// Cubic ease-out: 1 - (1-t)³
    #[default]
    Cubic,
    /// Quintic ease-out: 1 - (1-t)⁵
    Quintic,
    /// Exponential ease-out: 1 - 2^(-10t)
    Expo,
}

impl EasingType {
    /// Apply the easing function to a progress value
    ///
    /// Input is clamped to [0, 1].
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = clamp_unit(t);
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::Cubic => ease_out_cubic(t),
            EasingType::Quintic => ease_out_quintic(t),
            EasingType::Expo => ease_out_expo(t),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - clamp_unit(t);
    1.0 - inv * inv * inv
}

#[inline]
fn ease_out_quintic(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

#[inline]
fn ease_out_expo(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// NaN counts as the start of the curve.
#[inline]
fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing function
///
/// The curve runs from (0, 0) to (1, 1); `x1` and `x2` must lie in [0, 1]
/// for the curve to be a function of time, and are clamped to that range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    cx: f64,
    bx: f64,
    ax: f64,
    cy: f64,
    by: f64,
    ay: f64,
}

impl CubicBezier {
    const NEWTON_ITERATIONS: usize = 8;
    const EPSILON: f64 = 1e-7;

    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let x1 = x1.clamp(0.0, 1.0);
        let x2 = x2.clamp(0.0, 1.0);
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self { cx, bx, ax, cy, by, ay }
    }

    /// `cubic-bezier(.16, 1, .3, 1)`: fast start, long soft landing
    pub fn soft_out() -> Self {
        Self::new(0.16, 1.0, 0.3, 1.0)
    }

    fn sample_x(&self, s: f64) -> f64 {
        ((self.ax * s + self.bx) * s + self.cx) * s
    }

    fn sample_y(&self, s: f64) -> f64 {
        ((self.ay * s + self.by) * s + self.cy) * s
    }

    fn sample_dx(&self, s: f64) -> f64 {
        (3.0 * self.ax * s + 2.0 * self.bx) * s + self.cx
    }

    /// Find the curve parameter whose x coordinate equals `x`
    fn solve_param(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..Self::NEWTON_ITERATIONS {
            let err = self.sample_x(s) - x;
            if err.abs() < Self::EPSILON {
                return s;
            }
            let d = self.sample_dx(s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= err / d;
        }

        // Newton stalled on a flat segment; bisect instead
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        while hi - lo > Self::EPSILON {
            let v = self.sample_x(s);
            if (v - x).abs() < Self::EPSILON {
                break;
            }
            if v < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }

    /// Eased value at time fraction `t`
    pub fn apply(&self, t: f64) -> f64 {
        let t = clamp_unit(t);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        self.sample_y(self.solve_param(t))
    }
}
