//! In-memory store for the current day's events
//!
//! Entries keep the order the host sent them in. The host only pushes
//! today's events, so lookups compare time of day only.

use heapless::Vec;
use mirror_protocol::{Event, EventId, TimeOfDay};

/// Maximum number of events held at once
pub const MAX_EVENTS: usize = 16;

/// Bounded event list
#[derive(Debug, Clone, Default)]
pub struct EventStore<const N: usize = MAX_EVENTS> {
    events: Vec<Event, N>,
}

impl<const N: usize> EventStore<N> {
    /// Create an empty store
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Replace every entry, keeping at most the first `N`
    ///
    /// Returns the resulting number of entries.
    pub fn replace_all<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = Event>,
    {
        self.events.clear();
        for event in events.into_iter().take(N) {
            // Cannot fail: at most N items are taken
            let _ = self.events.push(event);
        }
        self.events.len()
    }

    /// Append one event
    ///
    /// Returns `false` and leaves the store unchanged when it is full.
    pub fn add(&mut self, event: Event) -> bool {
        self.events.push(event).is_ok()
    }

    /// Remove every entry with a matching id
    ///
    /// Returns how many entries were removed; zero is not an error.
    pub fn remove(&mut self, id: &EventId) -> usize {
        let before = self.events.len();
        self.events.retain(|event| &event.id != id);
        before - self.events.len()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Next event to show at `now`
    ///
    /// Scans in storage order and returns the first event at or after
    /// `now`. When every event has already passed, the first stored event
    /// is returned instead so the panel never goes blank while events
    /// exist. `None` only when the store is empty.
    pub fn next_upcoming(&self, now: TimeOfDay) -> Option<&Event> {
        self.events
            .iter()
            .find(|event| event.time >= now)
            .or_else(|| self.events.first())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.events.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Iterate in storage order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}
