//! Sync engine
//!
//! Owns everything the link feeds into: the line framer, the event store,
//! the link monitor and the forced-redraw flag. The firmware keeps exactly
//! one engine on its main loop and hands it to the render scheduler by
//! reference each tick.

use mirror_protocol::{
    Ack, AckLine, Command, DateTime, DecodeError, EncodeError, Event, LineFramer, TimeOfDay,
};

use crate::config::LinkConfig;
use crate::link::{LinkEvent, LinkMonitor, LinkState, Transition};
use crate::store::{EventStore, MAX_EVENTS};

/// What one received line did
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineOutcome {
    /// Store replaced wholesale
    Synced { count: usize },
    /// `add_event`; `accepted` is false when the store was full
    Added { accepted: bool, count: usize },
    /// `remove_event`; `removed` may be zero
    Removed { removed: usize, count: usize },
    /// Store emptied
    Cleared,
    /// `ping`
    Pong,
    /// Host supplied the wall clock; the caller applies it
    ClockSet(DateTime),
    /// Action this firmware does not know
    Unknown,
    /// Line dropped
    Rejected(DecodeError),
}

/// One processed line and its acknowledgement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub outcome: LineOutcome,
    /// Encoded ack to send; `None` when the link is down or the command
    /// is not acknowledged
    pub reply: Option<Result<AckLine, EncodeError>>,
}

/// Per-tick view handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub now: Option<DateTime>,
    pub connected: bool,
    pub next: Option<&'a Event>,
}

/// Event sync context
#[derive(Debug, Clone)]
pub struct SyncEngine<const N: usize = MAX_EVENTS> {
    framer: LineFramer,
    store: EventStore<N>,
    link: LinkMonitor,
    /// Set whenever something visible changed; cleared by a completed draw
    redraw: bool,
}

impl<const N: usize> SyncEngine<N> {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            framer: LineFramer::new(),
            store: EventStore::new(),
            link: LinkMonitor::new(config.readvertise_delay_ms),
            redraw: true,
        }
    }

    pub fn store(&self) -> &EventStore<N> {
        &self.store
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn framer(&self) -> &LineFramer {
        &self.framer
    }

    /// Begin advertising; called once at startup
    pub fn start(&mut self, now_ms: u64) -> Option<Transition> {
        self.on_link(LinkEvent::Start, now_ms)
    }

    /// Apply a link-layer notification
    pub fn on_link(&mut self, event: LinkEvent, now_ms: u64) -> Option<Transition> {
        let transition = self.link.handle(event, now_ms)?;
        self.apply_transition(&transition);
        Some(transition)
    }

    /// Drive the re-advertise timer
    pub fn poll_link(&mut self, now_ms: u64) -> Option<Transition> {
        let transition = self.link.poll(now_ms)?;
        self.apply_transition(&transition);
        Some(transition)
    }

    /// Time at which [`poll_link`](Self::poll_link) next has work, if any
    pub fn next_link_deadline(&self) -> Option<u64> {
        self.link.readvertise_at()
    }

    fn apply_transition(&mut self, transition: &Transition) {
        // A line never spans two connections
        if transition.left_connected() || transition.entered_connected() {
            self.framer.reset();
        }
        // Status indicator changes with every transition
        self.redraw = true;
    }

    /// Feed one inbound fragment
    ///
    /// Every line the fragment completes is decoded and applied in order,
    /// then handed to `on_dispatch` together with its ack. Returns the
    /// number of lines processed.
    pub fn receive<F>(&mut self, fragment: &[u8], now_ms: u64, mut on_dispatch: F) -> usize
    where
        F: FnMut(Dispatch),
    {
        let Self {
            framer,
            store,
            link,
            redraw,
        } = self;
        let connected = link.state().is_connected();

        framer.feed(fragment, |line| {
            let dispatch = match Command::decode(line) {
                Ok(command) => {
                    let (outcome, ack) = apply(store, redraw, &command, now_ms);
                    Dispatch {
                        outcome,
                        reply: ack.filter(|_| connected).map(|ack| ack.encode()),
                    }
                }
                Err(err) => Dispatch {
                    outcome: LineOutcome::Rejected(err),
                    reply: None,
                },
            };
            on_dispatch(dispatch);
        })
    }

    /// Check if a repaint has been requested
    pub fn redraw_requested(&self) -> bool {
        self.redraw
    }

    /// Force a repaint on the next tick
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Called by the renderer after a completed repaint
    pub fn clear_redraw(&mut self) {
        self.redraw = false;
    }

    /// Build the render view for this tick
    pub fn snapshot(&self, now: Option<DateTime>) -> Snapshot<'_> {
        let time = now.map_or(TimeOfDay::MIDNIGHT, |dt| dt.time);
        Snapshot {
            now,
            connected: self.link.state().is_connected(),
            next: self.store.next_upcoming(time),
        }
    }
}

/// Apply a decoded command to the store
fn apply<const N: usize>(
    store: &mut EventStore<N>,
    redraw: &mut bool,
    command: &Command,
    now_ms: u64,
) -> (LineOutcome, Option<Ack>) {
    let ack = command.ack_kind().map(|kind| Ack::new(kind, now_ms));

    match command {
        Command::SyncEvents { events } => {
            let count = store.replace_all(events.iter().cloned());
            *redraw = true;
            (
                LineOutcome::Synced { count },
                ack.map(|a| a.with_count(count)),
            )
        }
        Command::AddEvent { event } => {
            let accepted = store.add(event.clone());
            *redraw |= accepted;
            let count = store.len();
            (
                LineOutcome::Added { accepted, count },
                ack.map(|a| a.with_id(event.id.clone()).with_count(count)),
            )
        }
        Command::RemoveEvent { id } => {
            let removed = store.remove(id);
            *redraw |= removed > 0;
            let count = store.len();
            (
                LineOutcome::Removed { removed, count },
                ack.map(|a| a.with_id(id.clone()).with_count(count)),
            )
        }
        Command::RemoveAllEvents => {
            store.clear();
            *redraw = true;
            (LineOutcome::Cleared, ack.map(|a| a.with_count(0)))
        }
        Command::Ping => (LineOutcome::Pong, ack),
        Command::SetClock(now) => {
            *redraw = true;
            (LineOutcome::ClockSet(*now), ack)
        }
        Command::Unknown => (LineOutcome::Unknown, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use mirror_protocol::EventId;

    fn connected_engine() -> SyncEngine {
        let mut engine = SyncEngine::new(&LinkConfig::default());
        engine.start(0);
        engine.on_link(LinkEvent::PeerConnected, 0);
        engine.clear_redraw();
        engine
    }

    fn receive_all(engine: &mut SyncEngine, bytes: &[u8], now_ms: u64) -> Vec<Dispatch> {
        let mut out = Vec::new();
        engine.receive(bytes, now_ms, |d| out.push(d));
        out
    }

    fn reply_text(dispatch: &Dispatch) -> &str {
        let line = dispatch.reply.as_ref().unwrap().as_ref().unwrap();
        core::str::from_utf8(line).unwrap()
    }

    #[test]
    fn test_ping_is_answered_when_connected() {
        let mut engine = connected_engine();
        let out = receive_all(&mut engine, b"{\"action\":\"ping\"}\n", 42);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].outcome, LineOutcome::Pong);
        assert_eq!(reply_text(&out[0]), "{\"action\":\"pong\",\"timestamp\":42}\n");
        assert!(!engine.redraw_requested());
    }

    #[test]
    fn test_no_ack_while_not_connected() {
        let mut engine: SyncEngine = SyncEngine::new(&LinkConfig::default());
        engine.start(0);
        let out = receive_all(
            &mut engine,
            b"{\"action\":\"add_event\",\"event\":{\"id\":1,\"name\":\"a\",\"time\":\"09:00\"}}\n",
            0,
        );
        assert_eq!(
            out[0].outcome,
            LineOutcome::Added {
                accepted: true,
                count: 1
            }
        );
        assert!(out[0].reply.is_none());
        assert_eq!(engine.store().len(), 1);
    }

    #[test]
    fn test_add_ack_echoes_id_and_count() {
        let mut engine = connected_engine();
        let out = receive_all(
            &mut engine,
            b"{\"action\":\"add_event\",\"event\":{\"id\":\"x\",\"name\":\"a\",\"time\":\"09:00\"}}\n",
            7,
        );
        assert_eq!(
            reply_text(&out[0]),
            "{\"action\":\"add_event_ack\",\"id\":\"x\",\"count\":1,\"timestamp\":7}\n"
        );
        assert!(engine.redraw_requested());
    }

    #[test]
    fn test_rejected_add_reports_unchanged_count() {
        let mut engine: SyncEngine<1> = SyncEngine::new(&LinkConfig::default());
        engine.start(0);
        engine.on_link(LinkEvent::PeerConnected, 0);
        let line = b"{\"action\":\"add_event\",\"event\":{\"id\":1,\"name\":\"a\",\"time\":\"09:00\"}}\n";
        engine.receive(line, 0, |_| {});
        engine.clear_redraw();

        let mut outcome = None;
        engine.receive(line, 0, |d| outcome = Some(d.outcome));
        assert_eq!(
            outcome,
            Some(LineOutcome::Added {
                accepted: false,
                count: 1
            })
        );
        assert!(!engine.redraw_requested());
    }

    #[test]
    fn test_remove_all_ack_has_zero_count() {
        let mut engine = connected_engine();
        let out = receive_all(&mut engine, b"{\"action\":\"remove_all_events\"}\n", 1);
        assert_eq!(out[0].outcome, LineOutcome::Cleared);
        assert_eq!(
            reply_text(&out[0]),
            "{\"action\":\"remove_all_events_ack\",\"count\":0,\"timestamp\":1}\n"
        );
    }

    #[test]
    fn test_remove_missing_id_does_not_redraw() {
        let mut engine = connected_engine();
        let out = receive_all(&mut engine, b"{\"action\":\"remove_event\",\"id\":9}\n", 0);
        assert_eq!(
            out[0].outcome,
            LineOutcome::Removed {
                removed: 0,
                count: 0
            }
        );
        assert!(out[0].reply.is_some());
        assert!(!engine.redraw_requested());
    }

    #[test]
    fn test_unknown_and_malformed_lines() {
        let mut engine = connected_engine();
        let out = receive_all(
            &mut engine,
            b"{\"action\":\"dance\"}\nnot json\n{\"action\":\"ping\"}\n",
            0,
        );
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].outcome, LineOutcome::Unknown);
        assert!(out[0].reply.is_none());
        assert_eq!(out[1].outcome, LineOutcome::Rejected(DecodeError::Json));
        assert!(out[1].reply.is_none());
        assert_eq!(out[2].outcome, LineOutcome::Pong);
    }

    #[test]
    fn test_set_clock_forces_redraw() {
        let mut engine = connected_engine();
        let out = receive_all(
            &mut engine,
            b"{\"action\":\"set_clock\",\"date\":\"2026-10-16\",\"time\":\"07:45\"}\n",
            3,
        );
        let LineOutcome::ClockSet(now) = out[0].outcome else {
            panic!("expected clock set");
        };
        assert_eq!(now.time, TimeOfDay::new(7, 45).unwrap());
        assert_eq!(
            reply_text(&out[0]),
            "{\"action\":\"set_clock_ack\",\"timestamp\":3}\n"
        );
        assert!(engine.redraw_requested());
    }

    #[test]
    fn test_disconnect_resets_framer_but_keeps_store() {
        let mut engine = connected_engine();
        receive_all(
            &mut engine,
            b"{\"action\":\"add_event\",\"event\":{\"id\":1,\"name\":\"a\",\"time\":\"09:00\"}}\n{\"act",
            0,
        );
        assert!(engine.framer().pending() > 0);

        let t = engine.on_link(LinkEvent::PeerDisconnected, 100).unwrap();
        assert_eq!(t.to, LinkState::Disconnected);
        assert_eq!(engine.framer().pending(), 0);
        assert_eq!(engine.store().len(), 1);
        assert!(engine.redraw_requested());
    }

    #[test]
    fn test_connect_discards_bytes_from_before() {
        let mut engine: SyncEngine = SyncEngine::new(&LinkConfig::default());
        engine.start(0);
        let out = receive_all(&mut engine, b"{\"act", 0);
        assert!(out.is_empty());
        assert!(engine.framer().pending() > 0);

        let t = engine.on_link(LinkEvent::PeerConnected, 10).unwrap();
        assert!(t.entered_connected());
        assert_eq!(engine.framer().pending(), 0);

        let out = receive_all(&mut engine, b"{\"action\":\"ping\"}\n", 20);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].outcome, LineOutcome::Pong);
        assert!(out[0].reply.is_some());
    }

    #[test]
    fn test_readvertise_through_engine() {
        let mut engine = connected_engine();
        engine.on_link(LinkEvent::PeerDisconnected, 1_000);
        assert_eq!(engine.next_link_deadline(), Some(1_500));
        assert!(engine.poll_link(1_200).is_none());
        let t = engine.poll_link(1_500).unwrap();
        assert_eq!(t.to, LinkState::Advertising);
    }

    #[test]
    fn test_snapshot_without_clock_uses_first_event() {
        let mut engine = connected_engine();
        receive_all(
            &mut engine,
            b"{\"action\":\"sync_events\",\"events\":[{\"id\":5,\"name\":\"a\",\"time\":\"09:00\"},{\"id\":6,\"name\":\"b\",\"time\":\"08:00\"}]}\n",
            0,
        );
        let snapshot = engine.snapshot(None);
        assert!(snapshot.connected);
        assert_eq!(snapshot.next.unwrap().id, EventId::Int(5));
    }
}
