//! Connection indicator line
//!
//! BLE serial modules report a connection by holding a STATE line high.
//! Some blink that line while advertising, so a rising level only counts
//! once it has held longer than a blink phase. A falling level is taken
//! quickly so outgoing acks stop soon after the peer goes.

use super::LinkEvent;

/// Filters raw STATE samples into connect and disconnect events
#[derive(Debug, Clone)]
pub struct StateLine {
    connected: bool,
    /// When the line first disagreed with `connected` (ms)
    changed_at: Option<u64>,
    connect_ms: u32,
    disconnect_ms: u32,
}

impl StateLine {
    /// Start out disconnected
    ///
    /// A high level must hold for `connect_ms` and a low level for
    /// `disconnect_ms` before it is reported.
    pub fn new(connect_ms: u32, disconnect_ms: u32) -> Self {
        Self {
            connected: false,
            changed_at: None,
            connect_ms,
            disconnect_ms,
        }
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Feed one sample of the line (`true` = high)
    pub fn sample(&mut self, high: bool, now_ms: u64) -> Option<LinkEvent> {
        if high == self.connected {
            self.changed_at = None;
            return None;
        }

        let since = *self.changed_at.get_or_insert(now_ms);
        let hold = if high {
            self.connect_ms
        } else {
            self.disconnect_ms
        };

        if now_ms.saturating_sub(since) < u64::from(hold) {
            return None;
        }

        self.connected = high;
        self.changed_at = None;
        Some(if high {
            LinkEvent::PeerConnected
        } else {
            LinkEvent::PeerDisconnected
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &mut StateLine, high: bool, from_ms: u64, to_ms: u64) -> Option<LinkEvent> {
        let mut reported = None;
        for t in (from_ms..to_ms).step_by(20) {
            if let Some(event) = line.sample(high, t) {
                assert!(reported.is_none(), "two events in one phase");
                reported = Some(event);
            }
        }
        reported
    }

    #[test]
    fn test_advertising_blink_is_not_a_connection() {
        let mut line = StateLine::new(700, 50);
        for cycle in 0..10u64 {
            let start = cycle * 1_000;
            assert_eq!(run(&mut line, true, start, start + 500), None);
            assert_eq!(run(&mut line, false, start + 500, start + 1_000), None);
        }
        assert!(!line.connected());
    }

    #[test]
    fn test_steady_high_connects() {
        let mut line = StateLine::new(700, 50);
        assert_eq!(
            run(&mut line, true, 0, 1_000),
            Some(LinkEvent::PeerConnected)
        );
        assert!(line.connected());
    }

    #[test]
    fn test_low_disconnects_quickly() {
        let mut line = StateLine::new(700, 50);
        run(&mut line, true, 0, 1_000);

        assert_eq!(line.sample(false, 1_000), None);
        assert_eq!(line.sample(false, 1_040), None);
        assert_eq!(line.sample(false, 1_050), Some(LinkEvent::PeerDisconnected));
        assert!(!line.connected());
    }

    #[test]
    fn test_glitch_restarts_hold() {
        let mut line = StateLine::new(700, 50);
        line.sample(true, 0);
        line.sample(false, 400);
        assert_eq!(line.sample(true, 600), None);
        assert_eq!(line.sample(true, 1_250), None);
        assert_eq!(line.sample(true, 1_300), Some(LinkEvent::PeerConnected));
    }
}
