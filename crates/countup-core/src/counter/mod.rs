//! Animated statistic counters
//!
//! # Layers
//!
//! ## Atomic
//! - `step` - quantization step policies
//! - `format` - digit grouping and column widths
//! - `stat` - counter targets parsed from display text
//! - `visibility` - intersection ratio and the one-shot trigger
//! - `scheduler` - "call me back at" port
//!
//! ## Molecular
//! - `driver` - time → displayed values state machine
//! - `session` - trigger + driver + reduced-motion bypass + teardown
//!
//! # Usage
//!
//! ```ignore
//! let mut session = CounterSession::new(
//!     config.page.stat_targets(),
//!     config.counter.clone(),
//!     DeadlineScheduler::new(),
//!     HostMotion::detect(config.counter.reduced_motion),
//! );
//!
//! // every frame
//! session.on_visibility(ratio, clock.now());
//! if let Some(frame) = session.poll(clock.now()) {
//!     render(&frame.formatted());
//! }
//! ```

pub mod driver;
pub mod format;
pub mod scheduler;
pub mod session;
pub mod stat;
pub mod step;
pub mod visibility;

pub use driver::{AnimationDriver, Frame, Phase};
pub use format::{display_width, format_with_separator, format_with_spaces};
pub use scheduler::{DeadlineScheduler, TickScheduler};
pub use session::{CounterSession, SessionState};
pub use stat::{sanitize_target, StatTarget};
pub use step::{resolve_desired_steps, StepPolicy, DEFAULT_DESIRED_STEPS};
pub use visibility::{intersection_ratio, Region, TriggerState, Viewport, VisibilityTrigger};
