//! Counter animation driver
//!
//! Turns elapsed time into displayed values: elapsed fraction, eased,
//! scaled to each target, snapped to that target's step. Ticks closer together
//! than the tick interval are dropped, except the one that completes the
//! animation, so the run always ends on time with the exact targets.

use std::time::Duration;

use serde::Serialize;

use super::format::format_with_spaces;
use crate::config::CounterConfig;
use crate::easing::EasingType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// One emission of displayed values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub values: Vec<u64>,
    /// Set on the final frame, which always carries the exact targets
    pub complete: bool,
}

impl Frame {
    pub fn formatted(&self) -> Vec<String> {
        self.values.iter().map(|v| format_with_spaces(*v)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct AnimationDriver {
    targets: Vec<u64>,
    steps: Vec<u64>,
    displayed: Vec<u64>,
    duration: Duration,
    tick_interval: Duration,
    easing: EasingType,
    phase: Phase,
    start: Option<Duration>,
    last_tick: Option<Duration>,
}

impl AnimationDriver {
    pub fn new(targets: &[u64], config: &CounterConfig) -> Self {
        let steps = targets.iter().map(|t| config.step_for(*t)).collect();
        Self {
            targets: targets.to_vec(),
            steps,
            displayed: vec![0; targets.len()],
            duration: config.duration(),
            tick_interval: config.tick_interval(),
            easing: config.easing,
            phase: Phase::Idle,
            start: None,
            last_tick: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn displayed(&self) -> &[u64] {
        &self.displayed
    }

    pub fn targets(&self) -> &[u64] {
        &self.targets
    }

    pub fn steps(&self) -> &[u64] {
        &self.steps
    }

    /// Idle → Running; ignored in any other phase
    pub fn start(&mut self, now: Duration) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Running;
        self.start = Some(now);
        self.last_tick = None;
        true
    }

    /// Elapsed fraction in [0, 1]; a zero duration is already done
    fn progress(&self, now: Duration) -> f64 {
        let Some(start) = self.start else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Advance the animation to `now`
    ///
    /// Returns a frame only when a displayed value changed, or when the
    /// animation completes.
    pub fn tick(&mut self, now: Duration) -> Option<Frame> {
        if self.phase != Phase::Running {
            return None;
        }

        let p = self.progress(now);
        if p >= 1.0 {
            return self.complete();
        }

        if let Some(last) = self.last_tick {
            if now < last + self.tick_interval {
                return None;
            }
        }
        self.last_tick = Some(now);

        let eased = self.easing.apply(p);
        let mut changed = false;
        for i in 0..self.targets.len() {
            let next = snap(self.targets[i], self.steps[i], eased).max(self.displayed[i]);
            if next != self.displayed[i] {
                self.displayed[i] = next;
                changed = true;
            }
        }

        changed.then(|| Frame {
            values: self.displayed.clone(),
            complete: false,
        })
    }

    /// Jump to the exact targets and stop
    ///
    /// Emits once; later calls return `None`.
    pub fn complete(&mut self) -> Option<Frame> {
        if self.phase == Phase::Completed {
            return None;
        }
        self.phase = Phase::Completed;
        self.displayed.clone_from(&self.targets);
        Some(Frame {
            values: self.targets.clone(),
            complete: true,
        })
    }

    /// Time of the next useful tick while running
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.phase != Phase::Running {
            return None;
        }
        let start = self.start?;
        let end = start + self.duration;
        let next = match self.last_tick {
            Some(last) => last + self.tick_interval,
            None => start,
        };
        Some(next.min(end))
    }
}

/// Eased target value snapped to `step`, never above `target`
fn snap(target: u64, step: u64, eased: f64) -> u64 {
    let step = step.max(1);
    let raw = target as f64 * eased;
    let units = (raw / step as f64).round();
    let snapped = if units <= 0.0 {
        0
    } else {
        (units as u64).saturating_mul(step)
    };
    snapped.min(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn config(duration_ms: u64) -> CounterConfig {
        CounterConfig {
            duration_ms,
            ..Default::default()
        }
    }

    /// Drive a started driver with a callback every `every` ms until done
    fn run_to_end(driver: &mut AnimationDriver, every: u64) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut t = 0;
        while driver.phase() == Phase::Running {
            if let Some(frame) = driver.tick(ms(t)) {
                frames.push(frame);
            }
            t += every;
            assert!(t < 60_000, "driver never completed");
        }
        frames
    }

    #[test]
    fn test_idle_until_started() {
        let mut driver = AnimationDriver::new(&[120], &config(3000));
        assert_eq!(driver.phase(), Phase::Idle);
        assert_eq!(driver.tick(ms(100)), None);
        assert_eq!(driver.displayed(), &[0]);
        assert_eq!(driver.next_deadline(), None);
    }

    #[test]
    fn test_start_only_once() {
        let mut driver = AnimationDriver::new(&[120], &config(3000));
        assert!(driver.start(ms(0)));
        assert!(!driver.start(ms(500)));
        driver.complete();
        assert!(!driver.start(ms(600)));
        assert_eq!(driver.phase(), Phase::Completed);
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(120, 4, 0.0), 0);
        assert_eq!(snap(120, 4, 0.5), 60);
        assert_eq!(snap(120, 4, 0.51), 60);
        assert_eq!(snap(150_000, 3948, 1.0), 150_000);
        assert_eq!(snap(150_000, 3948, 0.999), 150_000);
        assert_eq!(snap(10, 1, 0.26), 3);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let targets = [120, 150_000, 10];
        let mut driver = AnimationDriver::new(&targets, &config(3000));
        driver.start(ms(0));
        let frames = run_to_end(&mut driver, 7);

        let mut prev = vec![0u64; 3];
        for frame in &frames {
            for i in 0..3 {
                assert!(frame.values[i] >= prev[i]);
                assert!(frame.values[i] <= targets[i]);
            }
            prev = frame.values.clone();
        }
    }

    #[test]
    fn test_converges_exactly() {
        let targets = [120, 150_000, 10];
        let mut driver = AnimationDriver::new(&targets, &config(3000));
        driver.start(ms(0));
        let frames = run_to_end(&mut driver, 33);

        let last = frames.last().unwrap();
        assert!(last.complete);
        assert_eq!(last.values, targets.to_vec());
        assert_eq!(driver.displayed(), &targets);
        assert_eq!(driver.tick(ms(10_000)), None);
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut driver = AnimationDriver::new(&[120, 7], &config(0));
        driver.start(ms(5));
        let frame = driver.tick(ms(5)).unwrap();
        assert!(frame.complete);
        assert_eq!(frame.values, vec![120, 7]);
        assert_eq!(driver.phase(), Phase::Completed);
    }

    #[test]
    fn test_throttle_drops_close_ticks() {
        let mut driver = AnimationDriver::new(&[10_000], &config(3000));
        driver.start(ms(0));
        driver.tick(ms(0));
        // 16ms later is inside the 33ms interval
        assert_eq!(driver.tick(ms(16)), None);
        assert!(driver.tick(ms(40)).is_some());
    }

    #[test]
    fn test_completion_not_throttled() {
        let mut driver = AnimationDriver::new(&[10_000], &config(100));
        driver.start(ms(0));
        driver.tick(ms(90));
        let frame = driver.tick(ms(100)).unwrap();
        assert!(frame.complete);
    }

    #[test]
    fn test_skipped_ticks_still_complete_on_time() {
        let mut driver = AnimationDriver::new(&[500], &config(3000));
        driver.start(ms(0));
        driver.tick(ms(0));
        // Host stalls for the whole animation
        let frame = driver.tick(ms(3001)).unwrap();
        assert!(frame.complete);
        assert_eq!(frame.values, vec![500]);
    }

    #[test]
    fn test_large_target_emission_bound() {
        let cfg = CounterConfig::default();
        let mut driver = AnimationDriver::new(&[150_000], &cfg);
        assert!(driver.steps()[0] >= 100);

        driver.start(ms(0));
        let frames = run_to_end(&mut driver, 1);
        assert!(frames.len() <= 50, "{} emissions", frames.len());
    }

    #[test]
    fn test_next_deadline() {
        let mut driver = AnimationDriver::new(&[120], &config(3000));
        driver.start(ms(1000));
        assert_eq!(driver.next_deadline(), Some(ms(1000)));
        driver.tick(ms(1000));
        assert_eq!(driver.next_deadline(), Some(ms(1033)));

        let mut short = AnimationDriver::new(&[120], &config(20));
        short.start(ms(0));
        short.tick(ms(0));
        assert_eq!(short.next_deadline(), Some(ms(20)));
    }

    #[test]
    fn test_backwards_time_never_lowers_values() {
        let mut driver = AnimationDriver::new(&[1000], &config(1000));
        driver.start(ms(0));
        driver.tick(ms(500));
        let high = driver.displayed()[0];
        assert!(driver.tick(ms(100)).is_none());
        assert_eq!(driver.displayed()[0], high);
    }

    #[test]
    fn test_empty_targets() {
        let mut driver = AnimationDriver::new(&[], &config(100));
        driver.start(ms(0));
        assert_eq!(driver.tick(ms(0)), None);
        let frame = driver.tick(ms(100)).unwrap();
        assert!(frame.values.is_empty());
        assert!(frame.complete);
    }

    #[test]
    fn test_frame_formatted() {
        let frame = Frame {
            values: vec![120, 150_000, 10],
            complete: true,
        };
        assert_eq!(frame.formatted(), vec!["120", "150 000", "10"]);
    }
}
