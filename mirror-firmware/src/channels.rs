//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Everything that changes engine state goes through [`DEVICE_EVENTS`] so
//! the controller sees fragments and link changes in arrival order.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use portable_atomic::AtomicBool;

use mirror_core::link::hm10::AtCommand;
use mirror_core::link::LinkEvent;
use mirror_protocol::AckLine;

/// Largest chunk the receive task forwards at once
pub const RX_CHUNK: usize = 32;

/// Channel capacity for device events
const DEVICE_EVENT_CHANNEL_SIZE: usize = 16;

/// Channel capacity for outbound writes
///
/// Matches the device event queue so one ack per queued line fits
const OUTBOUND_CHANNEL_SIZE: usize = DEVICE_EVENT_CHANNEL_SIZE;

/// Raw bytes read from the radio module
pub type Fragment = Vec<u8, RX_CHUNK>;

/// Input to the controller
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// Bytes received from the connected peer
    Fragment(Fragment),
    /// Connection state change reported by the module
    Link(LinkEvent),
}

/// Bytes to write to the radio module
#[derive(Debug, Clone)]
pub enum Outbound {
    /// Acknowledgement line for the peer, chunked by the transmit task
    Ack(AckLine),
    /// Module command, only valid while no peer is connected
    At(AtCommand),
}

/// Fragments and link events for the controller
pub static DEVICE_EVENTS: Channel<CriticalSectionRawMutex, DeviceEvent, DEVICE_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Writes for the transmit task
pub static OUTBOUND: Channel<CriticalSectionRawMutex, Outbound, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Display power requested by the button (true = on)
pub static DISPLAY_POWERED: AtomicBool = AtomicBool::new(true);

/// Module STATE line; checked by the transmit task before every chunk
pub static LINK_CONNECTED: AtomicBool = AtomicBool::new(false);
