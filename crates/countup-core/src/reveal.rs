//! Scroll reveal: sections that fade and slide in the first time they are seen
//!
//! Shares the one-shot trigger with the counters. Once revealed, each
//! transition runs along `cubic-bezier(.16, 1, .3, 1)` after its delay.

use std::time::Duration;

use tracing::debug;

use crate::config::RevealConfig;
use crate::counter::VisibilityTrigger;
use crate::easing::CubicBezier;
use crate::motion::MotionPreference;

/// Timing of one revealed element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTransition {
    pub duration: Duration,
    pub delay: Duration,
    curve: CubicBezier,
}

impl RevealTransition {
    pub fn new(duration: Duration, delay: Duration) -> Self {
        Self {
            duration,
            delay,
            curve: CubicBezier::soft_out(),
        }
    }

    /// Text block timing
    pub fn text(config: &RevealConfig) -> Self {
        Self::new(
            Duration::from_millis(config.text_duration_ms),
            Duration::from_millis(config.text_delay_ms),
        )
    }

    /// Image/map timing
    pub fn media(config: &RevealConfig) -> Self {
        Self::new(Duration::from_millis(config.media_duration_ms), Duration::ZERO)
    }

    /// Eased progress `elapsed` after the reveal fired
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = active.as_secs_f64() / self.duration.as_secs_f64();
        self.curve.apply(t)
    }

    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealState {
    Hidden,
    /// Reduced motion: reveal on the next poll, without animating
    Deferred,
    Revealed { at: Duration, instant: bool },
}

#[derive(Debug, Clone)]
pub struct Reveal {
    trigger: VisibilityTrigger,
    bottom_margin: f64,
    state: RevealState,
}

impl Reveal {
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            trigger: VisibilityTrigger::new(config.threshold),
            bottom_margin: config.bottom_margin,
            state: RevealState::Hidden,
        }
    }

    /// Viewport bottom margin to use when computing this element's ratio
    pub fn bottom_margin(&self) -> f64 {
        self.bottom_margin
    }

    /// Check of the motion preference, at mount or when it changes
    ///
    /// With reduced motion a hidden element skips observation and is
    /// revealed, fully settled, on the next [`Reveal::poll`]. A reveal
    /// already in flight jumps to its end state.
    pub fn arm(&mut self, motion: &impl MotionPreference) {
        if !motion.prefers_reduced_motion() {
            return;
        }
        match self.state {
            RevealState::Hidden => {
                self.trigger.dispose();
                self.state = RevealState::Deferred;
                debug!("Reduced motion preferred, deferring instant reveal");
            }
            RevealState::Revealed { at, instant: false } => {
                self.state = RevealState::Revealed { at, instant: true };
                debug!("Reduced motion preferred, settling reveal");
            }
            _ => {}
        }
    }

    /// Resolve a deferred reveal; returns `true` when it happened now
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.state == RevealState::Deferred {
            self.state = RevealState::Revealed { at: now, instant: true };
            return true;
        }
        false
    }

    /// Feed the visible fraction; returns `true` on the reveal itself
    pub fn observe(&mut self, ratio: f64, now: Duration) -> bool {
        if self.state != RevealState::Hidden || !self.trigger.observe(ratio) {
            return false;
        }
        debug!(ratio, "Section revealed");
        self.state = RevealState::Revealed { at: now, instant: false };
        true
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.state, RevealState::Revealed { .. })
    }

    /// Transition progress in [0, 1] at `now`
    pub fn progress(&self, transition: &RevealTransition, now: Duration) -> f64 {
        match self.state {
            RevealState::Hidden | RevealState::Deferred => 0.0,
            RevealState::Revealed { instant: true, .. } => 1.0,
            RevealState::Revealed { at, .. } => transition.progress(now.saturating_sub(at)),
        }
    }

    /// Whether `transition` is still moving at `now`
    pub fn is_animating(&self, transition: &RevealTransition, now: Duration) -> bool {
        match self.state {
            RevealState::Revealed { at, instant: false } => now.saturating_sub(at) < transition.end(),
            RevealState::Deferred => true,
            _ => false,
        }
    }

    /// Stop observing; a pending deferred reveal is dropped
    pub fn dispose(&mut self) {
        self.trigger.dispose();
        if self.state == RevealState::Deferred {
            self.state = RevealState::Hidden;
        }
    }
}

/// Rows of downward offset left at `progress`, starting from `max_rows`
pub fn offset_rows(progress: f64, max_rows: u16) -> u16 {
    let remaining = (1.0 - progress.clamp(0.0, 1.0)) * f64::from(max_rows);
    remaining.round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::FixedMotion;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_transition_respects_delay() {
        let t = RevealTransition::new(ms(1700), ms(80));
        assert_eq!(t.progress(ms(0)), 0.0);
        assert_eq!(t.progress(ms(80)), 0.0);
        assert!(t.progress(ms(500)) > 0.5);
        assert_eq!(t.progress(ms(1780)), 1.0);
        assert_eq!(t.progress(ms(9000)), 1.0);
    }

    #[test]
    fn test_zero_duration_transition() {
        let t = RevealTransition::new(Duration::ZERO, ms(10));
        assert_eq!(t.progress(ms(5)), 0.0);
        assert_eq!(t.progress(ms(10)), 1.0);
    }

    #[test]
    fn test_reveal_once_at_threshold() {
        let cfg = RevealConfig::default();
        let text = RevealTransition::text(&cfg);
        let mut reveal = Reveal::new(&cfg);
        reveal.arm(&FixedMotion(false));

        assert!(!reveal.observe(0.1, ms(0)));
        assert!(reveal.observe(0.25, ms(100)));
        assert!(!reveal.observe(1.0, ms(200)));
        assert!(reveal.is_revealed());

        assert_eq!(reveal.progress(&text, ms(100)), 0.0);
        assert!(reveal.is_animating(&text, ms(1000)));
        assert_eq!(reveal.progress(&text, ms(1880)), 1.0);
        assert!(!reveal.is_animating(&text, ms(1880)));
    }

    #[test]
    fn test_reduced_motion_settles_running_reveal() {
        let cfg = RevealConfig::default();
        let text = RevealTransition::text(&cfg);
        let mut reveal = Reveal::new(&cfg);
        reveal.arm(&FixedMotion(false));
        assert!(reveal.observe(1.0, ms(0)));
        assert!(reveal.is_animating(&text, ms(200)));

        reveal.arm(&FixedMotion(true));
        assert!(reveal.is_revealed());
        assert!(!reveal.is_animating(&text, ms(200)));
        assert_eq!(reveal.progress(&text, ms(200)), 1.0);
    }

    #[test]
    fn test_reduced_motion_reveals_instantly_on_next_poll() {
        let cfg = RevealConfig::default();
        let media = RevealTransition::media(&cfg);
        let mut reveal = Reveal::new(&cfg);
        reveal.arm(&FixedMotion(true));

        // Not synchronous with arming
        assert!(!reveal.is_revealed());
        assert!(reveal.poll(ms(16)));
        assert!(reveal.is_revealed());
        assert_eq!(reveal.progress(&media, ms(16)), 1.0);
        assert!(!reveal.is_animating(&media, ms(16)));
        assert!(!reveal.poll(ms(32)));
        // Visibility no longer matters
        assert!(!reveal.observe(1.0, ms(40)));
    }

    #[test]
    fn test_dispose_drops_deferred_reveal() {
        let cfg = RevealConfig::default();
        let mut reveal = Reveal::new(&cfg);
        reveal.arm(&FixedMotion(true));
        reveal.dispose();
        reveal.dispose();
        assert!(!reveal.poll(ms(16)));
        assert!(!reveal.observe(1.0, ms(20)));
        assert!(!reveal.is_revealed());
    }

    #[test]
    fn test_offset_rows() {
        assert_eq!(offset_rows(0.0, 2), 2);
        assert_eq!(offset_rows(0.5, 2), 1);
        assert_eq!(offset_rows(1.0, 2), 0);
        assert_eq!(offset_rows(7.0, 2), 0);
    }
}
