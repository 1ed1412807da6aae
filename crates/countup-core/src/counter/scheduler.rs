//! Tick scheduling port
//!
//! The session never sleeps or registers timers itself. It tells a scheduler
//! when it next wants to run, and the host (terminal loop, tokio task, test)
//! calls back when that time comes.

use std::time::Duration;

pub trait TickScheduler {
    /// Request a callback at `deadline`, replacing any earlier request
    fn schedule(&mut self, deadline: Duration);

    /// Drop the pending request, if any
    fn cancel(&mut self);

    /// When the host should call back next
    fn next_deadline(&self) -> Option<Duration>;
}

/// Single-slot scheduler the host polls
#[derive(Debug, Clone, Default)]
pub struct DeadlineScheduler {
    deadline: Option<Duration>,
}

impl DeadlineScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickScheduler for DeadlineScheduler {
    fn schedule(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
