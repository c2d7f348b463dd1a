//! Device identity

use core::fmt::Write;

use heapless::String;

use crate::config::MAX_PREFIX_LEN;

/// Advertised name: prefix, dash, four hex digits
pub type DeviceName = String<{ MAX_PREFIX_LEN + 5 }>;

/// Build the advertised name from a prefix and the chip's unique id
///
/// The suffix is the last two bytes of `unique_id` in upper-case hex, so
/// several mirrors in one room can be told apart.
pub fn device_name(prefix: &String<MAX_PREFIX_LEN>, unique_id: &[u8]) -> DeviceName {
    let tail = &unique_id[unique_id.len().saturating_sub(2)..];
    let (hi, lo) = match *tail {
        [hi, lo] => (hi, lo),
        [lo] => (0, lo),
        _ => (0, 0),
    };

    let mut name = DeviceName::new();
    // Capacity covers the longest prefix plus the suffix
    let _ = write!(name, "{}-{:02X}{:02X}", prefix, hi, lo);
    name
}
