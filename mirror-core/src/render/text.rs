//! Strings shown on the panel

use core::fmt::Write;

use heapless::String;
use mirror_protocol::{DateTime, TimeOfDay};

/// Shown instead of the clock when no time is available
pub const NO_TIME: &str = "--:--";
/// Shown instead of the date when no time is available
pub const NO_CLOCK: &str = "No clock";
/// Shown when the store is empty
pub const NO_EVENTS: &str = "No events";

/// "HH:MM"
pub type TimeText = String<5>;
/// "Fri 16 Oct 2026"
pub type DateText = String<15>;

pub fn time_text(time: TimeOfDay) -> TimeText {
    let mut text = TimeText::new();
    // Always exactly five characters
    let _ = write!(text, "{}", time);
    text
}

/// Large clock line
pub fn clock_text(now: Option<&DateTime>) -> TimeText {
    match now {
        Some(now) => time_text(now.time),
        None => TimeText::try_from(NO_TIME).unwrap_or_default(),
    }
}

/// Date line
pub fn date_text(now: Option<&DateTime>) -> DateText {
    let mut text = DateText::new();
    let _ = match now {
        Some(now) => write!(
            text,
            "{} {} {} {:04}",
            now.date.weekday_name(),
            now.date.day(),
            now.date.month_name(),
            now.date.year()
        ),
        None => text.push_str(NO_CLOCK).map_err(|_| core::fmt::Error),
    };
    text
}

/// Cut `name` to at most `max_chars` characters
pub fn truncate_chars(name: &str, max_chars: usize) -> &str {
    match name.char_indices().nth(max_chars) {
        Some((end, _)) => &name[..end],
        None => name,
    }
}
