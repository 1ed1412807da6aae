//! Scroll configuration helpers
//!
//! The config type itself lives in countup-core so it loads with the rest of
//! the TOML file.

use std::time::Duration;

pub use countup_core::ScrollConfig;

/// Extension trait for ScrollConfig with utility methods
pub trait ScrollConfigExt {
    /// Get animation duration as Duration
    fn animation_duration(&self) -> Duration;

    /// Check if smooth scrolling is effectively enabled
    fn is_smooth(&self) -> bool;

    /// Rows per line step, never zero
    fn line_step(&self) -> i64;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }

    #[inline]
    fn line_step(&self) -> i64 {
        i64::from(self.scroll_lines.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countup_core::EasingType;

    #[test]
    fn test_default_config() {
        let config = ScrollConfig::default();
        assert!(config.smooth_enabled);
        assert_eq!(config.animation_duration_ms, 150);
        assert_eq!(config.easing, EasingType::Cubic);
        assert_eq!(config.line_step(), 1);
    }

    #[test]
    fn test_is_smooth() {
        let mut config = ScrollConfig::default();
        assert!(config.is_smooth());

        config.smooth_enabled = false;
        assert!(!config.is_smooth());

        config.smooth_enabled = true;
        config.animation_duration_ms = 0;
        assert!(!config.is_smooth());
    }

    #[test]
    fn test_line_step_never_zero() {
        let config = ScrollConfig {
            scroll_lines: 0,
            ..Default::default()
        };
        assert_eq!(config.line_step(), 1);
    }
}
