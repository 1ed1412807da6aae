//! Time calculation utilities for scroll animations
//!
//! Timestamps are clock durations (see `countup_core::Clock`), which keeps
//! the scroller testable without sleeping.

use std::time::Duration;

/// Animation progress in [0, 1] at `now` for an animation that began at `start`
#[inline]
pub fn progress(start: Duration, now: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Duration, now: Duration, duration: Duration) -> bool {
    now.saturating_sub(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Interpolate between two row offsets, rounding to the nearest row
#[inline]
pub fn lerp_rows(from: u32, to: u32, t: f64) -> u32 {
    lerp(f64::from(from), f64::from(to), t).round().max(0.0) as u32
}
