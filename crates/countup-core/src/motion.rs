//! Reduced-motion accessibility preference
//!
//! The engine asks this port whether the host wants animations skipped.

use tokio::sync::watch;

/// Environment variable consulted by [`HostMotion`] when config has no override
pub const REDUCED_MOTION_ENV: &str = "COUNTUP_REDUCED_MOTION";

pub trait MotionPreference {
    fn prefers_reduced_motion(&self) -> bool;
}

/// Fixed answer, mostly for tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedMotion(pub bool);

impl MotionPreference for FixedMotion {
    fn prefers_reduced_motion(&self) -> bool {
        self.0
    }
}

/// Host preference: explicit config override, else the environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostMotion {
    reduced: bool,
}

impl HostMotion {
    pub fn detect(config_override: Option<bool>) -> Self {
        let reduced = match config_override {
            Some(value) => value,
            None => std::env::var(REDUCED_MOTION_ENV)
                .map(|raw| parse_flag(&raw))
                .unwrap_or(false),
        };
        tracing::debug!(reduced, "Detected reduced-motion preference");
        Self { reduced }
    }
}

impl MotionPreference for HostMotion {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced
    }
}

/// Live preference fed through a watch channel
#[derive(Debug, Clone)]
pub struct WatchMotion {
    rx: watch::Receiver<bool>,
}

impl WatchMotion {
    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }
}

impl MotionPreference for WatchMotion {
    fn prefers_reduced_motion(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Accepts the usual truthy spellings plus the CSS media value `reduce`
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "reduce"
    )
}
