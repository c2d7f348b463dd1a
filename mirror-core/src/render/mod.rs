//! Render scheduling
//!
//! One cooperative tick samples the clock and the event store and decides
//! whether the panel needs a repaint. Repaints happen at most once per
//! minute unless something visible changed in between.

pub mod layout;
pub mod scheduler;
pub mod text;

pub use layout::{Layout, Origin, CHAR_HEIGHT, CHAR_WIDTH};
pub use scheduler::{RenderScheduler, TickOutcome};
