//! Smooth page scrolling for the countup page
//!
//! # Layers
//!
//! ## Atomic
//! - `timing` - progress and interpolation over clock timestamps
//! - `config` - scroll configuration helpers (config lives in countup-core)
//!
//! ## Molecular
//! - `animation` - page scroller combining the atoms with core easing
//!
//! # Usage
//!
//! ```ignore
//! use countup_tui::scroll::PageScroller;
//!
//! let mut scroller = PageScroller::new(config.ui.scroll.clone());
//! scroller.scroll_by(10);
//!
//! // every frame
//! let offset = scroller.update(clock.now(), max_offset);
//! ```

pub mod config;
pub mod timing;

pub mod animation;

pub use animation::PageScroller;
pub use config::ScrollConfigExt;
