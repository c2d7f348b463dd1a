//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod clock;
pub mod display;

pub use clock::{Clock, ClockError};
pub use display::{Color, Display, DisplayError, Rect};
