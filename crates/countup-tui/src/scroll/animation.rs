//! Page scroller
//!
//! Batches scroll requests and eases the visible offset toward the target.
//! The offset it reports each frame is what the visibility observers see.

use std::time::Duration;

use countup_core::EasingType;

use super::config::{ScrollConfig, ScrollConfigExt};
use super::timing::{is_complete, lerp_rows, progress};

#[derive(Debug, Clone)]
struct ActiveScroll {
    start: Duration,
    from: u32,
    to: u32,
    duration: Duration,
    easing: EasingType,
}

/// Smoothly scrolled page offset
///
/// Requests accumulate via `scroll_by`/`jump_to`; call `update()` each frame
/// with the clock time to resolve them and advance the animation.
#[derive(Debug, Clone, Default)]
pub struct PageScroller {
    animation: Option<ActiveScroll>,
    config: ScrollConfig,
    offset: u32,
    pending_delta: i64,
    pending_jump: Option<u32>,
}

impl PageScroller {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether the next frame will move the page
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0 || self.pending_jump.is_some()
    }

    /// Current visible offset in rows
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Offset the page settles at once the animation ends
    pub fn target(&self) -> u32 {
        self.animation.as_ref().map_or(self.offset, |a| a.to)
    }

    /// Queue a relative scroll (positive = down)
    pub fn scroll_by(&mut self, delta: i64) {
        self.pending_delta += delta;
    }

    pub fn line_down(&mut self) {
        self.scroll_by(self.config.line_step());
    }

    pub fn line_up(&mut self) {
        self.scroll_by(-self.config.line_step());
    }

    pub fn half_page(&mut self, viewport_height: u16, down: bool) {
        let rows = i64::from((viewport_height / 2).max(1));
        self.scroll_by(if down { rows } else { -rows });
    }

    pub fn full_page(&mut self, viewport_height: u16, down: bool) {
        let rows = i64::from(viewport_height.max(1));
        self.scroll_by(if down { rows } else { -rows });
    }

    /// Queue an absolute jump; `u32::MAX` means the bottom
    pub fn jump_to(&mut self, offset: u32) {
        self.pending_delta = 0;
        self.pending_jump = Some(offset);
    }

    /// Resolve queued requests and advance the animation
    pub fn update(&mut self, now: Duration, max_offset: u32) -> u32 {
        let jump = self.pending_jump.take();
        let delta = std::mem::take(&mut self.pending_delta);
        let requested = match jump {
            Some(offset) => Some(offset.min(max_offset)),
            None if delta != 0 => {
                let base = i64::from(self.target());
                Some((base + delta).clamp(0, i64::from(max_offset)) as u32)
            }
            None => None,
        };

        if let Some(to) = requested {
            if !self.config.is_smooth() {
                self.animation = None;
                self.offset = to;
            } else if to != self.offset {
                self.animation = Some(ActiveScroll {
                    start: now,
                    from: self.offset,
                    to,
                    duration: self.config.animation_duration(),
                    easing: self.config.easing,
                });
            } else {
                self.animation = None;
            }
        }

        if let Some(anim) = &self.animation {
            if is_complete(anim.start, now, anim.duration) {
                self.offset = anim.to;
                self.animation = None;
            } else {
                let t = anim.easing.apply(progress(anim.start, now, anim.duration));
                self.offset = lerp_rows(anim.from, anim.to, t);
            }
        }

        self.offset = self.offset.min(max_offset);
        self.offset
    }
}
