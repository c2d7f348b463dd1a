//! Link monitor: state machine plus re-advertise timing

use super::machine::{LinkEvent, LinkState};

/// Default delay between a disconnect and advertising again
pub const DEFAULT_READVERTISE_DELAY_MS: u32 = 500;

/// Radio command the caller must carry out after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkAction {
    StartAdvertising,
    StopAdvertising,
}

/// A state change reported by [`LinkMonitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: LinkState,
    pub to: LinkState,
    pub action: Option<LinkAction>,
}

impl Transition {
    /// Check if this transition ends a connection
    pub fn left_connected(&self) -> bool {
        self.from.is_connected() && !self.to.is_connected()
    }

    /// Check if this transition starts a connection
    pub fn entered_connected(&self) -> bool {
        !self.from.is_connected() && self.to.is_connected()
    }
}

/// Tracks link state and decides when to re-advertise
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    state: LinkState,
    readvertise_delay_ms: u32,
    /// Time of the last disconnect (ms since boot)
    disconnected_at: Option<u64>,
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_READVERTISE_DELAY_MS)
    }
}

impl LinkMonitor {
    pub fn new(readvertise_delay_ms: u32) -> Self {
        Self {
            state: LinkState::Idle,
            readvertise_delay_ms,
            disconnected_at: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Apply a link event
    ///
    /// Returns `None` when the event does not change the state.
    pub fn handle(&mut self, event: LinkEvent, now_ms: u64) -> Option<Transition> {
        let from = self.state;
        let to = from.transition(event);
        if to == from {
            return None;
        }

        self.state = to;
        self.disconnected_at = match to {
            LinkState::Disconnected => Some(now_ms),
            _ => None,
        };

        let action = match (from, to) {
            (_, LinkState::Advertising) => Some(LinkAction::StartAdvertising),
            (LinkState::Advertising, LinkState::Connected) => Some(LinkAction::StopAdvertising),
            _ => None,
        };

        Some(Transition { from, to, action })
    }

    /// Time at which the pending re-advertise falls due, if any
    pub fn readvertise_at(&self) -> Option<u64> {
        self.disconnected_at
            .map(|at| at.saturating_add(u64::from(self.readvertise_delay_ms)))
    }

    /// Fire the re-advertise once its delay has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<Transition> {
        match self.readvertise_at() {
            Some(due) if now_ms >= due => self.handle(LinkEvent::ReadvertiseDue, now_ms),
            _ => None,
        }
    }
}
