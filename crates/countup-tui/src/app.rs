use std::time::Duration;

use tracing::{debug, info};

use countup_core::config::RevealConfig;
use countup_core::counter::{
    intersection_ratio, CounterSession, DeadlineScheduler, Region, SessionState, Viewport,
};
use countup_core::reveal::{Reveal, RevealTransition};
use countup_core::{AppConfig, Clock, FixedMotion, SystemClock};

use crate::input::Action;
use crate::page::PageLayout;
use crate::scroll::PageScroller;
use crate::theme::Theme;

/// Rows taken by the status bar
const STATUS_BAR_HEIGHT: u16 = 1;

/// A page section that fades in the first time it is seen
pub struct RevealedSection {
    pub reveal: Reveal,
    pub transition: RevealTransition,
}

impl RevealedSection {
    fn new(config: &RevealConfig, transition: RevealTransition, motion: &FixedMotion) -> Self {
        let mut reveal = Reveal::new(config);
        reveal.arm(motion);
        Self { reveal, transition }
    }

    fn update(&mut self, region: Region, viewport: Viewport, now: Duration) {
        self.reveal.poll(now);
        let ratio = intersection_ratio(region, viewport, self.reveal.bottom_margin());
        self.reveal.observe(ratio, now);
    }

    pub fn progress(&self, now: Duration) -> f64 {
        self.reveal.progress(&self.transition, now)
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.reveal.is_animating(&self.transition, now)
    }
}

/// Application state for the terminal page
pub struct App<C: Clock = SystemClock> {
    pub config: AppConfig,
    pub theme: Theme,
    clock: C,
    pub scroller: PageScroller,
    pub counters: CounterSession<DeadlineScheduler, FixedMotion>,
    pub about: RevealedSection,
    pub services: RevealedSection,
    pub layout: PageLayout,
    pub width: u16,
    /// Rows available to the page (terminal height minus the status bar)
    pub viewport_height: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Counter frames rendered since the last (re)mount
    pub frames_emitted: u64,
}

impl App<SystemClock> {
    pub fn new(config: AppConfig, theme: Theme, reduced_motion: bool) -> Self {
        Self::with_clock(config, theme, reduced_motion, SystemClock::new())
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(config: AppConfig, theme: Theme, reduced_motion: bool, clock: C) -> Self {
        let motion = FixedMotion(reduced_motion);
        let counters = CounterSession::new(
            config.page.stat_targets(),
            config.counter.clone(),
            DeadlineScheduler::new(),
            motion,
        );
        let about = RevealedSection::new(&config.reveal, RevealTransition::text(&config.reveal), &motion);
        let services =
            RevealedSection::new(&config.reveal, RevealTransition::media(&config.reveal), &motion);

        Self {
            scroller: PageScroller::new(config.ui.scroll.clone()),
            layout: PageLayout::default(),
            theme,
            clock,
            counters,
            about,
            services,
            width: 0,
            viewport_height: 0,
            should_quit: false,
            status_message: None,
            frames_emitted: 0,
            config,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn reduced_motion(&self) -> bool {
        self.counters.motion().0
    }

    /// Recompute the layout for a terminal of `width` x `height`
    pub fn resize(&mut self, width: u16, height: u16) {
        let viewport_height = height.saturating_sub(STATUS_BAR_HEIGHT);
        if width == self.width && viewport_height == self.viewport_height {
            return;
        }
        self.width = width;
        self.viewport_height = viewport_height;
        self.layout = PageLayout::compute(&self.config.page, width, viewport_height);
        debug!(width, viewport_height, total = self.layout.total_height, "Page layout computed");
    }

    /// Advance scrolling, feed the observers and run due counter ticks
    pub fn update(&mut self) {
        let now = self.now();
        let max_offset = self.layout.max_offset(self.viewport_height);
        let offset = self.scroller.update(now, max_offset);
        let viewport = Viewport::new(offset, u32::from(self.viewport_height));

        let ratio = intersection_ratio(self.layout.stats, viewport, 0.0);
        self.counters.on_visibility(ratio, now);
        if let Some(frame) = self.counters.poll(now) {
            self.frames_emitted += 1;
            if frame.complete {
                debug!(frames = self.frames_emitted, "Counters settled");
            }
        }

        self.about.update(self.layout.about, viewport, now);
        self.services.update(self.layout.services, viewport, now);
    }

    /// Whether the next frame should come at animation rate
    pub fn needs_fast_update(&self) -> bool {
        let now = self.now();
        self.scroller.needs_update()
            || self.counters.needs_update()
            || self.about.is_animating(now)
            || self.services.is_animating(now)
    }

    pub fn counter_state(&self) -> SessionState {
        self.counters.state()
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit(),
            Action::ScrollDown => self.scroller.line_down(),
            Action::ScrollUp => self.scroller.line_up(),
            Action::HalfPageDown => self.scroller.half_page(self.viewport_height, true),
            Action::HalfPageUp => self.scroller.half_page(self.viewport_height, false),
            Action::PageDown => self.scroller.full_page(self.viewport_height, true),
            Action::PageUp => self.scroller.full_page(self.viewport_height, false),
            Action::JumpToTop => self.scroller.jump_to(0),
            Action::JumpToBottom => self.scroller.jump_to(u32::MAX),
            Action::ToggleReducedMotion => self.toggle_reduced_motion(),
            Action::Replay => self.replay(),
            Action::None => {}
        }
    }

    pub fn toggle_reduced_motion(&mut self) {
        let reduced = !self.reduced_motion();
        let now = self.now();
        self.counters.motion_mut().0 = reduced;
        self.counters.motion_changed(now);
        if reduced {
            let motion = FixedMotion(true);
            self.about.reveal.arm(&motion);
            self.services.reveal.arm(&motion);
        }
        info!(reduced, "Reduced motion toggled");
        self.set_status(if reduced {
            "Reduced motion on"
        } else {
            "Reduced motion off"
        });
    }

    /// Remount the counters and reveals as if the page was loaded again
    pub fn replay(&mut self) {
        let motion = FixedMotion(self.reduced_motion());
        self.counters.reset(self.config.page.stat_targets());
        self.about = RevealedSection::new(
            &self.config.reveal,
            RevealTransition::text(&self.config.reveal),
            &motion,
        );
        self.services = RevealedSection::new(
            &self.config.reveal,
            RevealTransition::media(&self.config.reveal),
            &motion,
        );
        self.frames_emitted = 0;
        self.set_status("Counters reset");
    }

    /// Tear down observers and timers, then stop the loop
    pub fn quit(&mut self) {
        self.counters.dispose();
        self.about.reveal.dispose();
        self.services.reveal.dispose();
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
