use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Event handler for terminal events
///
/// Idles at `tick_rate` and switches to the animation frame rate while the
/// page, a reveal or the counters are moving.
pub struct EventHandler {
    tick_rate: Duration,
    frame_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64, animation_fps: u32) -> Self {
        let fps = u64::from(animation_fps.max(1));
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
            frame_rate: Duration::from_millis((1000 / fps).max(1)),
        }
    }

    pub fn timeout(&self, fast: bool) -> Duration {
        if fast {
            self.frame_rate.min(self.tick_rate)
        } else {
            self.tick_rate
        }
    }

    /// Poll for the next event
    pub fn next(&self, fast: bool) -> Result<Option<AppEvent>> {
        if event::poll(self.timeout(fast))? {
            match event::read()? {
                Event::Key(key) => {
                    // Release events arrive on some platforms
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts() {
        let handler = EventHandler::new(100, 60);
        assert_eq!(handler.timeout(false), Duration::from_millis(100));
        assert_eq!(handler.timeout(true), Duration::from_millis(16));
    }

    #[test]
    fn test_zero_fps_is_guarded() {
        let handler = EventHandler::new(50, 0);
        assert_eq!(handler.timeout(true), Duration::from_millis(50));
    }
}
