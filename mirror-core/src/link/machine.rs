//! Link state machine definition

/// Link states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Radio configured, not yet advertising
    Idle,
    /// Advertising, waiting for a peer
    Advertising,
    /// One peer connected; acknowledgements are sent
    Connected,
    /// Peer went away; waiting to re-advertise
    Disconnected,
}

/// Events that can trigger link transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Startup finished, begin advertising
    Start,
    /// Link layer reports a connection
    PeerConnected,
    /// Link layer reports the connection is gone
    PeerDisconnected,
    /// Re-advertise delay after a disconnect elapsed
    ReadvertiseDue,
}

impl LinkState {
    /// Check if acknowledgements may be sent
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::Connected)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (Idle, Start) => Advertising,

            (Advertising, PeerConnected) => Connected,

            (Connected, PeerDisconnected) => Disconnected,

            (Disconnected, ReadvertiseDue) => Advertising,
            // Peer came back before the re-advertise delay ran out
            (Disconnected, PeerConnected) => Connected,

            // Default: stay in current state
            _ => self,
        }
    }
}
