//! Calendar events as pushed by the host

use alloc::string::String;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::time::TimeOfDay;

/// Caller-assigned event identifier
///
/// The host may use integers or strings. Uniqueness is not enforced; an
/// integer and a string with the same digits are different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Int(i64),
    Text(String),
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        EventId::Int(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::Text(String::from(id))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Int(id) => write!(f, "{}", id),
            EventId::Text(id) => f.write_str(id),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EventId {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EventId::Int(id) => defmt::write!(f, "{}", id),
            EventId::Text(id) => defmt::write!(f, "{=str}", id.as_str()),
        }
    }
}

/// One scheduled event for today
///
/// The name is stored exactly as received; truncation for the panel
/// happens at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub time: TimeOfDay,
}

impl Event {
    pub fn new(id: impl Into<EventId>, name: &str, time: TimeOfDay) -> Self {
        Self {
            id: id.into(),
            name: String::from(name),
            time,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Event {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Event(id={}, name={=str}, time={})",
            self.id,
            self.name.as_str(),
            self.time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integer_id() {
        let event: Event =
            serde_json::from_str(r#"{"id":1,"name":"Standup","time":"09:00"}"#).unwrap();
        assert_eq!(event.id, EventId::Int(1));
        assert_eq!(event.name, "Standup");
        assert_eq!(event.time, TimeOfDay::new(9, 0).unwrap());
    }

    #[test]
    fn test_decode_string_id() {
        let event: Event =
            serde_json::from_str(r#"{"id":"abc-1","name":"Lunch","time":"12:30"}"#).unwrap();
        assert_eq!(event.id, EventId::from("abc-1"));
    }

    #[test]
    fn test_integer_and_string_ids_differ() {
        assert_ne!(EventId::Int(1), EventId::from("1"));
    }

    #[test]
    fn test_decode_rejects_bad_time() {
        let result: Result<Event, _> =
            serde_json::from_str(r#"{"id":1,"name":"x","time":"25:00"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let result: Result<Event, _> = serde_json::from_str(r#"{"id":1,"time":"09:00"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_event() {
        let event = Event::new(7, "Gym", TimeOfDay::new(18, 5).unwrap());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"id":7,"name":"Gym","time":"18:05"}"#);
    }
}
