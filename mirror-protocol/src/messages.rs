//! Message types for the sync protocol
//!
//! Message types are divided into two directions:
//! - Host → Mirror: [`Command`], one JSON document per line, discriminated
//!   by its `"action"` field
//! - Mirror → Host: [`Ack`], sent back for every recognized command

use alloc::vec::Vec as StdVec;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventId};
use crate::framer::LINE_TERMINATOR;
use crate::time::DateTime;

/// Longest encoded acknowledgement, terminator included
pub const MAX_ACK_LEN: usize = 256;

/// One encoded acknowledgement line, ready for fragmenting
pub type AckLine = Vec<u8, MAX_ACK_LEN>;

/// Reasons a received line could not be turned into a [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Line was empty or whitespace only
    Empty,
    /// Line is not valid UTF-8
    Utf8,
    /// Not a JSON object, no `action`, or a recognized action with a bad payload
    Json,
}

/// Reasons an [`Ack`] could not be encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Serializer failure
    Json,
    /// Encoded line exceeds [`MAX_ACK_LEN`]
    TooLong,
}

/// Commands sent by the host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Replace the whole event list
    SyncEvents { events: StdVec<Event> },
    /// Append one event
    AddEvent { event: Event },
    /// Remove every event carrying this id
    RemoveEvent { id: EventId },
    /// Drop all events
    RemoveAllEvents,
    /// Liveness check, answered with `pong`
    Ping,
    /// Set the wall clock: `{"date":"YYYY-MM-DD","time":"HH:MM:SS"}`
    SetClock(DateTime),
    /// Any action this firmware does not know; accepted and ignored
    #[serde(other)]
    Unknown,
}

impl Command {
    /// Decode one line (terminator already stripped)
    pub fn decode(line: &[u8]) -> Result<Self, DecodeError> {
        let text = core::str::from_utf8(line).map_err(|_| DecodeError::Utf8)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(DecodeError::Empty);
        }
        serde_json::from_str(text).map_err(|_| DecodeError::Json)
    }

    /// Wire name of the action, for logging
    pub fn action(&self) -> &'static str {
        match self {
            Command::SyncEvents { .. } => "sync_events",
            Command::AddEvent { .. } => "add_event",
            Command::RemoveEvent { .. } => "remove_event",
            Command::RemoveAllEvents => "remove_all_events",
            Command::Ping => "ping",
            Command::SetClock(_) => "set_clock",
            Command::Unknown => "unknown",
        }
    }

    /// Acknowledgement kind this command is answered with, if any
    pub fn ack_kind(&self) -> Option<AckKind> {
        match self {
            Command::SyncEvents { .. } => Some(AckKind::SyncEventsAck),
            Command::AddEvent { .. } => Some(AckKind::AddEventAck),
            Command::RemoveEvent { .. } => Some(AckKind::RemoveEventAck),
            Command::RemoveAllEvents => Some(AckKind::RemoveAllEventsAck),
            Command::Ping => Some(AckKind::Pong),
            Command::SetClock(_) => Some(AckKind::SetClockAck),
            Command::Unknown => None,
        }
    }
}

/// The `action` value of an acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum AckKind {
    SyncEventsAck,
    AddEventAck,
    RemoveEventAck,
    RemoveAllEventsAck,
    SetClockAck,
    Pong,
}

/// Acknowledgement sent back to the host
///
/// `count` carries the store size after the command was applied, so a
/// rejected `add_event` is visible to the host as an unchanged count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub action: AckKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Milliseconds since boot
    pub timestamp: u64,
}

impl Ack {
    pub fn new(action: AckKind, timestamp: u64) -> Self {
        Self {
            action,
            id: None,
            count: None,
            timestamp,
        }
    }

    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Serialize to one terminated line
    pub fn encode(&self) -> Result<AckLine, EncodeError> {
        let mut json = serde_json::to_vec(self).map_err(|_| EncodeError::Json)?;
        json.push(LINE_TERMINATOR);
        AckLine::from_slice(&json).map_err(|_| EncodeError::TooLong)
    }
}
