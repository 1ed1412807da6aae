//! One-shot visibility trigger
//!
//! Hosts report how much of the watched element is inside the viewport; the
//! trigger fires the first time that fraction reaches its threshold and then
//! stops watching for good.

/// Vertical extent of a watched element, in rows of page content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub top: u32,
    pub height: u32,
}

impl Region {
    pub fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }
}

/// Visible window onto the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(offset: u32, height: u32) -> Self {
        Self { offset, height }
    }
}

/// Fraction of `region` inside `viewport`, in [0, 1]
///
/// `bottom_margin` shrinks the viewport from the bottom by that fraction of
/// its height, so an element has to travel a little further up before it
/// counts as visible.
pub fn intersection_ratio(region: Region, viewport: Viewport, bottom_margin: f64) -> f64 {
    if region.height == 0 || viewport.height == 0 {
        return 0.0;
    }

    let margin = bottom_margin.clamp(0.0, 1.0);
    let shrink = (f64::from(viewport.height) * margin).round() as u32;
    let view_top = viewport.offset;
    let view_bottom = viewport
        .offset
        .saturating_add(viewport.height.saturating_sub(shrink));

    let top = region.top.max(view_top);
    let bottom = region.bottom().min(view_bottom);
    if bottom <= top {
        return 0.0;
    }
    f64::from(bottom - top) / f64::from(region.height)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Observing; has not fired yet
    Watching,
    /// Fired once; observation stopped
    Fired,
    /// No element, or disposed before firing
    Detached,
}

#[derive(Debug, Clone)]
pub struct VisibilityTrigger {
    state: TriggerState,
    threshold: f64,
    present: bool,
}

impl VisibilityTrigger {
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            state: TriggerState::Watching,
            threshold,
            present: true,
        }
    }

    /// Trigger for an element that does not exist; never fires
    pub fn absent() -> Self {
        Self {
            state: TriggerState::Detached,
            threshold: 1.0,
            present: false,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn has_fired(&self) -> bool {
        self.state == TriggerState::Fired
    }

    /// Feed the current visible fraction
    ///
    /// Returns `true` exactly once: the first time the fraction reaches the
    /// threshold while watching. A zero ratio never fires, even with a zero
    /// threshold.
    pub fn observe(&mut self, ratio: f64) -> bool {
        if self.state != TriggerState::Watching || ratio.is_nan() || ratio <= 0.0 {
            return false;
        }
        if ratio >= self.threshold {
            self.state = TriggerState::Fired;
            true
        } else {
            false
        }
    }

    /// Stop observing; safe to call any number of times
    pub fn dispose(&mut self) {
        if self.state == TriggerState::Watching {
            self.state = TriggerState::Detached;
        }
    }

    /// Start watching again at `threshold`, as after a remount
    ///
    /// A trigger built with [`VisibilityTrigger::absent`] stays detached.
    pub fn rearm(&mut self, threshold: f64) {
        self.threshold = threshold;
        if self.present {
            self.state = TriggerState::Watching;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_fully_visible() {
        let r = intersection_ratio(Region::new(10, 5), Viewport::new(0, 40), 0.0);
        assert_eq!(r, 1.0);
    }

    #[test]
    fn test_ratio_partially_visible() {
        // rows 30..40 of region 30..40, viewport 0..35
        let r = intersection_ratio(Region::new(30, 10), Viewport::new(0, 35), 0.0);
        assert!((r - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_outside() {
        assert_eq!(
            intersection_ratio(Region::new(50, 10), Viewport::new(0, 40), 0.0),
            0.0
        );
        assert_eq!(
            intersection_ratio(Region::new(0, 10), Viewport::new(20, 40), 0.0),
            0.0
        );
    }

    #[test]
    fn test_ratio_bottom_margin() {
        // Viewport 0..40 shrinks to 0..36 with a 10% bottom margin
        let region = Region::new(34, 4);
        assert_eq!(intersection_ratio(region, Viewport::new(0, 40), 0.0), 1.0);
        assert!((intersection_ratio(region, Viewport::new(0, 40), 0.1) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_degenerate_sizes() {
        assert_eq!(intersection_ratio(Region::new(0, 0), Viewport::new(0, 10), 0.0), 0.0);
        assert_eq!(intersection_ratio(Region::new(0, 5), Viewport::new(0, 0), 0.0), 0.0);
    }

    #[test]
    fn test_fires_once() {
        let mut trigger = VisibilityTrigger::new(0.35);
        assert!(!trigger.observe(0.1));
        assert!(trigger.observe(0.4));
        assert!(trigger.has_fired());

        // Leaving and re-entering the viewport never fires again
        for ratio in [0.0, 1.0, 0.0, 0.5, 1.0] {
            assert!(!trigger.observe(ratio));
        }
    }

    #[test]
    fn test_absent_never_fires() {
        let mut trigger = VisibilityTrigger::absent();
        assert!(!trigger.observe(1.0));
        assert_eq!(trigger.state(), TriggerState::Detached);

        trigger.rearm(0.2);
        assert!(!trigger.observe(1.0));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut trigger = VisibilityTrigger::new(0.2);
        trigger.dispose();
        trigger.dispose();
        assert!(!trigger.observe(1.0));

        let mut fired = VisibilityTrigger::new(0.2);
        assert!(fired.observe(1.0));
        fired.dispose();
        assert_eq!(fired.state(), TriggerState::Fired);
    }

    #[test]
    fn test_rearm_allows_one_more_fire() {
        let mut trigger = VisibilityTrigger::new(0.2);
        assert!(trigger.observe(1.0));
        trigger.rearm(0.5);
        assert!(!trigger.observe(0.4));
        assert!(trigger.observe(0.5));
        assert!(!trigger.observe(1.0));
    }

    #[test]
    fn test_nan_ratio_ignored() {
        let mut trigger = VisibilityTrigger::new(0.0);
        assert!(!trigger.observe(f64::NAN));
        assert!(!trigger.observe(0.0));
        assert!(trigger.observe(0.01));
    }
}
