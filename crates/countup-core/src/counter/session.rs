//! Counter session: one mounted group of animated statistics
//!
//! Wires the visibility trigger, the driver, the reduced-motion bypass and the
//! tick scheduler together and owns their lifecycle. Hosts feed it visibility
//! ratios and call [`CounterSession::poll`] (or [`CounterSession::on_tick`]
//! when their own callback fires); every returned [`Frame`] should be
//! rendered.

use std::time::Duration;

use tracing::debug;

use super::driver::{AnimationDriver, Frame, Phase};
use super::format::format_with_spaces;
use super::scheduler::TickScheduler;
use super::stat::StatTarget;
use super::visibility::VisibilityTrigger;
use crate::config::CounterConfig;
use crate::motion::MotionPreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the element to become visible (or for the deferred
    /// reduced-motion callback)
    Idle,
    Running,
    Completed,
    /// Torn down; never emits again
    Disposed,
}

pub struct CounterSession<S, M> {
    targets: Vec<StatTarget>,
    config: CounterConfig,
    driver: AnimationDriver,
    trigger: VisibilityTrigger,
    scheduler: S,
    motion: M,
    bypass_pending: bool,
    disposed: bool,
}

impl<S: TickScheduler, M: MotionPreference> CounterSession<S, M> {
    pub fn new(targets: Vec<StatTarget>, config: CounterConfig, scheduler: S, motion: M) -> Self {
        let values: Vec<u64> = targets.iter().map(|t| t.target).collect();
        let driver = AnimationDriver::new(&values, &config);
        let trigger = VisibilityTrigger::new(config.visibility_threshold);
        Self {
            targets,
            config,
            driver,
            trigger,
            scheduler,
            motion,
            bypass_pending: false,
            disposed: false,
        }
    }

    /// Session whose host element is missing; it stays idle forever
    pub fn without_element(mut self) -> Self {
        self.trigger = VisibilityTrigger::absent();
        self
    }

    pub fn targets(&self) -> &[StatTarget] {
        &self.targets
    }

    /// Currently displayed values, one per target
    pub fn displayed(&self) -> &[u64] {
        self.driver.displayed()
    }

    /// Displayed values with thousands grouping
    pub fn formatted(&self) -> Vec<String> {
        self.displayed()
            .iter()
            .map(|v| format_with_spaces(*v))
            .collect()
    }

    pub fn steps(&self) -> &[u64] {
        self.driver.steps()
    }

    pub fn has_fired(&self) -> bool {
        self.trigger.has_fired()
    }

    pub fn state(&self) -> SessionState {
        if self.disposed {
            return SessionState::Disposed;
        }
        match self.driver.phase() {
            Phase::Idle => SessionState::Idle,
            Phase::Running => SessionState::Running,
            Phase::Completed => SessionState::Completed,
        }
    }

    /// Whether the host has a pending callback to honour
    pub fn needs_update(&self) -> bool {
        !self.disposed && self.scheduler.next_deadline().is_some()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        if self.disposed {
            None
        } else {
            self.scheduler.next_deadline()
        }
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    /// Report the visible fraction of the host element
    ///
    /// The first report at or above the threshold starts the session. Nothing
    /// is emitted from here; the start is always delivered through a
    /// scheduled tick.
    pub fn on_visibility(&mut self, ratio: f64, now: Duration) {
        if self.disposed || !self.trigger.observe(ratio) {
            return;
        }
        debug!(ratio, targets = self.targets.len(), "Counter became visible");
        self.begin(now);
    }

    fn begin(&mut self, now: Duration) {
        if self.motion.prefers_reduced_motion() {
            debug!("Reduced motion preferred, skipping counter ramp");
            self.schedule_bypass(now);
        } else {
            self.driver.start(now);
            self.scheduler.schedule(now);
        }
    }

    fn schedule_bypass(&mut self, now: Duration) {
        self.bypass_pending = true;
        self.scheduler.schedule(now);
    }

    /// Scheduled callback: advance and maybe emit
    pub fn on_tick(&mut self, now: Duration) -> Option<Frame> {
        if self.disposed {
            return None;
        }

        if self.bypass_pending {
            self.bypass_pending = false;
            self.scheduler.cancel();
            let frame = self.driver.complete();
            if frame.is_some() {
                debug!("Counter snapped to targets");
            }
            return frame;
        }

        if self.driver.phase() != Phase::Running {
            return None;
        }

        let frame = self.driver.tick(now);
        match self.driver.next_deadline() {
            Some(deadline) => self.scheduler.schedule(deadline),
            None => {
                self.scheduler.cancel();
                debug!(values = ?self.driver.displayed(), "Counter animation completed");
            }
        }
        frame
    }

    /// Run the scheduled callback if it is due
    pub fn poll(&mut self, now: Duration) -> Option<Frame> {
        match self.next_deadline() {
            Some(deadline) if deadline <= now => self.on_tick(now),
            _ => None,
        }
    }

    /// Re-read the motion preference after the host reports a change
    ///
    /// Switching to reduced motion mid-run abandons the ramp and snaps to the
    /// targets on the next callback. Switching it off never restarts anything.
    pub fn motion_changed(&mut self, now: Duration) {
        if self.disposed || !self.motion.prefers_reduced_motion() {
            return;
        }
        if self.driver.phase() == Phase::Running && !self.bypass_pending {
            debug!("Reduced motion enabled mid-run, snapping counters");
            self.scheduler.cancel();
            self.schedule_bypass(now);
        }
    }

    /// Tear down: cancel the pending callback and stop observing
    ///
    /// Safe before start, mid-run, after completion, and repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.bypass_pending = false;
        self.scheduler.cancel();
        self.trigger.dispose();
        debug!(state = ?self.driver.phase(), "Counter session disposed");
    }

    /// Replace the targets, as a remount: everything starts over from zero
    pub fn reset(&mut self, targets: Vec<StatTarget>) {
        self.reset_with(targets, self.config.clone());
    }

    /// Replace targets and tuning
    pub fn reset_with(&mut self, targets: Vec<StatTarget>, config: CounterConfig) {
        self.scheduler.cancel();
        let values: Vec<u64> = targets.iter().map(|t| t.target).collect();
        self.driver = AnimationDriver::new(&values, &config);
        self.trigger.rearm(config.visibility_threshold);
        self.targets = targets;
        self.config = config;
        self.bypass_pending = false;
        self.disposed = false;
        debug!(targets = self.targets.len(), "Counter session reset");
    }
}
