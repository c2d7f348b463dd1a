//! Wall clock trait

use mirror_protocol::DateTime;

/// Errors that can occur with the wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Clock hardware is not running
    Unavailable,
    /// Hardware refused the value
    Rejected,
}

/// Trait for the date/time source
///
/// Implementations wrap an RTC or any other calendar clock.
pub trait Clock {
    /// Current date and time, or `None` if the clock has not been set
    ///
    /// Takes `&mut self` because RTC reads typically require mutable access.
    fn now(&mut self) -> Option<DateTime>;

    /// Set the wall clock
    fn set(&mut self, now: DateTime) -> Result<(), ClockError>;
}
