//! Wall-clock types carried on the wire
//!
//! Event times are "HH:MM" strings in 24-hour form. Dates only travel with
//! `set_clock` as "YYYY-MM-DD".

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors from parsing a time or date string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// Wrong shape (missing separator, non-digits, wrong field width)
    Malformed,
    /// Field outside its calendar range
    OutOfRange,
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::Malformed => f.write_str("malformed time"),
            TimeError::OutOfRange => f.write_str("time out of range"),
        }
    }
}

/// Minute-resolution time of day
///
/// Ordering is chronological within a day, which is also the ordering of
/// the zero-padded "HH:MM" strings the host sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Midnight
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// Build a time of day, validating ranges
    pub const fn new(hour: u8, minute: u8) -> Result<Self, TimeError> {
        if hour > 23 || minute > 59 {
            return Err(TimeError::OutOfRange);
        }
        Ok(Self { hour, minute })
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight
    pub const fn minutes(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    /// Accepts "H:MM" and "HH:MM"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s.split_once(':').ok_or(TimeError::Malformed)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(TimeError::Malformed);
        }
        TimeOfDay::new(parse_digits(h)? as u8, parse_digits(m)? as u8)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ParseVisitor::<TimeOfDay>::new("a time as \"HH:MM\""))
    }
}

/// Calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    year: u16,
    month: u8,
    day: u8,
}

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Monday first, matching `Date::weekday`
const WEEKDAY_ABBREV: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

impl Date {
    /// Build a date, validating month and day (leap years included)
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, TimeError> {
        if year == 0 || !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month)
        {
            return Err(TimeError::OutOfRange);
        }
        Ok(Self { year, month, day })
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Day of week, 0 = Monday .. 6 = Sunday
    pub fn weekday(&self) -> u8 {
        // Sakamoto's method (0 = Sunday), shifted to Monday-first
        const T: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let y = if self.month < 3 { self.year - 1 } else { self.year };
        let sunday_first =
            (y + y / 4 - y / 100 + y / 400 + T[self.month as usize - 1] + self.day as u16) % 7;
        ((sunday_first + 6) % 7) as u8
    }

    /// Three-letter weekday name
    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_ABBREV[self.weekday() as usize]
    }

    /// Three-letter month name
    pub fn month_name(&self) -> &'static str {
        MONTH_ABBREV[self.month as usize - 1]
    }
}

fn is_leap(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl FromStr for Date {
    type Err = TimeError;

    /// Accepts "YYYY-MM-DD"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let (Some(y), Some(m), Some(d), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::Malformed);
        };
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return Err(TimeError::Malformed);
        }
        Date::new(parse_digits(y)?, parse_digits(m)? as u8, parse_digits(d)? as u8)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ParseVisitor::<Date>::new("a date as \"YYYY-MM-DD\""))
    }
}

/// Date plus second-resolution time, as read from the RTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub date: Date,
    pub time: TimeOfDay,
    pub second: u8,
}

impl DateTime {
    pub fn new(date: Date, time: TimeOfDay, second: u8) -> Result<Self, TimeError> {
        if second > 59 {
            return Err(TimeError::OutOfRange);
        }
        Ok(Self { date, time, second })
    }

    /// Parse the `set_clock` pair: "YYYY-MM-DD" and "HH:MM" or "HH:MM:SS"
    pub fn parse(date: &str, time: &str) -> Result<Self, TimeError> {
        let date: Date = date.parse()?;
        if !time.is_ascii() {
            return Err(TimeError::Malformed);
        }
        let (hm, second) = match time.len() {
            8 => {
                let (hm, s) = time.split_at(5);
                let s = s.strip_prefix(':').ok_or(TimeError::Malformed)?;
                (hm, parse_digits(s)? as u8)
            }
            _ => (time, 0),
        };
        DateTime::new(date, hm.parse()?, second)
    }
}

/// `set_clock` payload shape: `{"date":"YYYY-MM-DD","time":"HH:MM[:SS]"}`
impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            date: String,
            time: String,
        }

        let wire = Wire::deserialize(deserializer)?;
        DateTime::parse(&wire.date, &wire.time).map_err(de::Error::custom)
    }
}

fn parse_digits(s: &str) -> Result<u16, TimeError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::Malformed);
    }
    s.parse().map_err(|_| TimeError::Malformed)
}

/// Deserializes any `FromStr` wire string, reporting `expecting` on failure
struct ParseVisitor<T> {
    expecting: &'static str,
    _marker: core::marker::PhantomData<T>,
}

impl<T> ParseVisitor<T> {
    fn new(expecting: &'static str) -> Self {
        Self {
            expecting,
            _marker: core::marker::PhantomData,
        }
    }
}

impl<'de, T> Visitor<'de> for ParseVisitor<T>
where
    T: FromStr<Err = TimeError>,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expecting)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}
