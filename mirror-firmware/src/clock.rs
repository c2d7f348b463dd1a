//! RTC-backed wall clock
//!
//! The RP2040 RTC loses its time on reset, so the clock reads as
//! unavailable until the host sends `set_clock`.

use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime as RtcDateTime, DayOfWeek, Rtc};

use mirror_core::traits::{Clock, ClockError};
use mirror_protocol::{Date, DateTime, TimeOfDay};

/// [`Clock`] over the on-chip RTC
pub struct RtcClock {
    rtc: Rtc<'static, RTC>,
}

impl RtcClock {
    pub fn new(rtc: Rtc<'static, RTC>) -> Self {
        Self { rtc }
    }
}

impl Clock for RtcClock {
    fn now(&mut self) -> Option<DateTime> {
        let now = self.rtc.now().ok()?;
        let date = Date::new(now.year, now.month, now.day).ok()?;
        let time = TimeOfDay::new(now.hour, now.minute).ok()?;
        DateTime::new(date, time, now.second).ok()
    }

    fn set(&mut self, now: DateTime) -> Result<(), ClockError> {
        let value = RtcDateTime {
            year: now.date.year(),
            month: now.date.month(),
            day: now.date.day(),
            day_of_week: day_of_week(now.date.weekday()),
            hour: now.time.hour(),
            minute: now.time.minute(),
            second: now.second,
        };
        self.rtc.set_datetime(value).map_err(|_| ClockError::Rejected)
    }
}

/// Monday-first weekday index to the RTC's enum
fn day_of_week(weekday: u8) -> DayOfWeek {
    match weekday {
        0 => DayOfWeek::Monday,
        1 => DayOfWeek::Tuesday,
        2 => DayOfWeek::Wednesday,
        3 => DayOfWeek::Thursday,
        4 => DayOfWeek::Friday,
        5 => DayOfWeek::Saturday,
        _ => DayOfWeek::Sunday,
    }
}
