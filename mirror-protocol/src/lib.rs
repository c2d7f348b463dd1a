//! Mirror Sync Protocol
//!
//! This crate defines the protocol spoken between the companion host and the
//! mirror over a BLE serial attribute. The link delivers small fragments
//! (20 bytes on most centrals), so the protocol is line-oriented text:
//!
//! ```text
//! {"action":"add_event","event":{"id":1,"name":"Standup","time":"09:00"}}\n
//! └──────────────────────────── one JSON document ──────────────────────┘ └ LF
//! ```
//!
//! - [`framer`] reassembles fragments into lines and splits outbound lines
//!   back into fragments.
//! - [`messages`] decodes lines into [`Command`]s and encodes [`Ack`]s.
//! - [`event`] and [`time`] hold the data model shared with the core.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod event;
pub mod framer;
pub mod messages;
pub mod time;

pub use event::{Event, EventId};
pub use framer::{fragments, LineFramer, DEFAULT_FRAGMENT_SIZE, LINE_TERMINATOR, MAX_LINE_LEN};
pub use messages::{Ack, AckKind, AckLine, Command, DecodeError, EncodeError, MAX_ACK_LEN};
pub use time::{Date, DateTime, TimeError, TimeOfDay};
