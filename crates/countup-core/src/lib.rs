pub mod clock;
pub mod config;
pub mod counter;
pub mod easing;
pub mod error;
pub mod motion;
pub mod reveal;
pub mod runtime;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, CounterConfig, RevealConfig, ScrollConfig};
pub use counter::{CounterSession, DeadlineScheduler, Frame, StatTarget};
pub use easing::EasingType;
pub use error::{Error, Result};
pub use motion::{FixedMotion, HostMotion, MotionPreference};
pub use runtime::{spawn_counter, CounterHandle};
