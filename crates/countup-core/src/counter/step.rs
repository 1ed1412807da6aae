//! Quantization step selection
//!
//! A counter only changes its displayed value in multiples of its step, which
//! bounds the number of visible updates no matter how large the target is.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of visible value changes per counter
pub const DEFAULT_DESIRED_STEPS: u32 = 38;

/// Lower bound on the timing-derived step budget
const MIN_DERIVED_STEPS: u32 = 12;

/// How the step for a target is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPolicy {
    /// Magnitude tiers with a per-tier minimum step
    #[default]
    Tiered,
    /// Round the raw step to 1, 2 or 5 times a power of ten
    Nice,
}

impl StepPolicy {
    /// Step for animating 0..=`target` in roughly `desired_steps` changes
    ///
    /// Always at least 1.
    pub fn step_for(&self, target: u64, desired_steps: u32) -> u64 {
        match self {
            StepPolicy::Tiered => tiered_step(target, desired_steps),
            StepPolicy::Nice => nice_step(target, desired_steps),
        }
    }
}

/// Tiered policy: every integer up to 10, then coarser minimums per magnitude
pub fn tiered_step(target: u64, desired_steps: u32) -> u64 {
    let per_step = target.div_ceil(u64::from(desired_steps.max(1)));
    match target {
        0..=10 => 1,
        11..=200 => per_step.max(2),
        201..=5000 => per_step.max(10),
        _ => per_step.max(100),
    }
}

/// "Nice" policy: 1/2/5 × 10^k so the digits do not flicker
pub fn nice_step(target: u64, desired_steps: u32) -> u64 {
    let raw = target as f64 / f64::from(desired_steps.max(1));
    if !raw.is_finite() || raw <= 0.0 {
        return 1;
    }

    let pow = 10f64.powi(raw.log10().floor() as i32);
    let x = raw / pow;
    let multiplier = if x <= 1.0 {
        1.0
    } else if x <= 2.0 {
        2.0
    } else if x <= 5.0 {
        5.0
    } else {
        10.0
    };

    let step = (multiplier * pow).round();
    if step < 1.0 {
        1
    } else {
        step as u64
    }
}

/// Step budget derived from animation timing: about one change per frame
pub fn derived_steps(duration: Duration, fps: u32) -> u32 {
    let frames = (duration.as_secs_f64() * f64::from(fps)).round();
    let frames = if frames > f64::from(u32::MAX) {
        u32::MAX
    } else {
        frames as u32
    };
    frames.max(MIN_DERIVED_STEPS)
}

/// Configured budget, or the timing-derived one when configured as 0
pub fn resolve_desired_steps(configured: u32, duration: Duration, fps: u32) -> u32 {
    if configured == 0 {
        derived_steps(duration, fps)
    } else {
        configured
    }
}
