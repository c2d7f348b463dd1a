//! HM-10 BLE serial module commands
//!
//! The module runs in manual-start mode (`AT+IMME1`) so advertising only
//! begins when the link monitor asks for it. Connection state is read from
//! the STATE pin, not from `OK+CONN` notifications, so those stay off and
//! nothing but peer data arrives on the UART while connected.

use core::fmt::Write;

use heapless::String;

use super::LinkAction;
use crate::device::DeviceName;

/// One module command, sent without a line terminator
pub type AtCommand = String<32>;

/// Longest name the module stores
pub const MAX_MODULE_NAME: usize = 12;

/// Do not advertise until `AT+START`
const MANUAL_START: &str = "AT+IMME1";

/// No connect/disconnect notifications on the UART
const NOTIFY_OFF: &str = "AT+NOTI0";

/// STATE held low while unconnected instead of blinking
const STATE_STEADY: &str = "AT+PIO11";

/// Begin advertising
const START: &str = "AT+START";

fn command(text: &str) -> AtCommand {
    let mut cmd = AtCommand::new();
    // Every command here is shorter than the buffer
    let _ = cmd.push_str(text);
    cmd
}

/// Commands sent once at boot, before the first advertise
pub fn setup_commands(name: &DeviceName) -> [AtCommand; 4] {
    let mut set_name = AtCommand::new();
    let _ = write!(set_name, "AT+NAME{}", name);
    [
        command(STATE_STEADY),
        command(MANUAL_START),
        command(NOTIFY_OFF),
        set_name,
    ]
}

/// Module command for a link action, if the module needs one
///
/// The HM-10 stops advertising on its own when a central connects, so
/// only starting needs a command.
pub fn action_command(action: LinkAction) -> Option<AtCommand> {
    match action {
        LinkAction::StartAdvertising => Some(command(START)),
        LinkAction::StopAdvertising => None,
    }
}
