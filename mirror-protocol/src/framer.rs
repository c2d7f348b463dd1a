//! Line framing for the BLE serial link.
//!
//! Inbound bytes arrive in fragments no larger than the link MTU. A message
//! may span any number of fragments and one fragment may carry the tail of
//! one message plus several complete ones. [`LineFramer`] owns the
//! reassembly buffer and hands out each complete line exactly once.
//!
//! Outbound lines are cut into MTU-sized pieces with [`fragments`].

use heapless::Vec;

/// Byte that terminates every message on the wire
pub const LINE_TERMINATOR: u8 = b'\n';

/// Maximum length of one inbound line (excluding the terminator)
///
/// Bounds the reassembly buffer. A full `sync_events` for a day's worth of
/// events fits comfortably.
pub const MAX_LINE_LEN: usize = 2048;

/// Payload size of one link write/notification on a default-MTU connection
pub const DEFAULT_FRAGMENT_SIZE: usize = 20;

/// Reassembles newline-delimited messages from transport fragments
#[derive(Debug, Clone)]
pub struct LineFramer {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Set after an overflow; bytes are dropped until the next terminator
    discarding: bool,
    overflows: u32,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create an empty framer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
            overflows: 0,
        }
    }

    /// Discard any partially received line
    ///
    /// Called on disconnect so nothing from the old connection leaks into
    /// the first message of the next one.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Number of bytes buffered towards the next line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Number of lines dropped because they exceeded [`MAX_LINE_LEN`]
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Append a fragment and emit every line it completes
    ///
    /// `on_line` receives each complete line without its terminator, in
    /// arrival order. Returns the number of lines emitted.
    pub fn feed<F>(&mut self, fragment: &[u8], mut on_line: F) -> usize
    where
        F: FnMut(&[u8]),
    {
        let mut emitted = 0;
        let mut rest = fragment;

        while let Some(pos) = rest.iter().position(|&b| b == LINE_TERMINATOR) {
            let head = &rest[..pos];
            rest = &rest[pos + 1..];

            if self.discarding {
                // Tail of an oversized line
                self.discarding = false;
                continue;
            }

            if self.buffer.is_empty() && head.len() <= MAX_LINE_LEN {
                on_line(head);
                emitted += 1;
            } else if self.buffer.extend_from_slice(head).is_ok() {
                on_line(self.buffer.as_slice());
                self.buffer.clear();
                emitted += 1;
            } else {
                self.buffer.clear();
                self.overflows = self.overflows.saturating_add(1);
            }
        }

        if !self.discarding && !rest.is_empty() && self.buffer.extend_from_slice(rest).is_err() {
            self.buffer.clear();
            self.discarding = true;
            self.overflows = self.overflows.saturating_add(1);
        }

        emitted
    }
}

/// Split an encoded line into link-sized fragments, in order
///
/// A `max_fragment` of zero is treated as one byte per fragment.
pub fn fragments(line: &[u8], max_fragment: usize) -> impl Iterator<Item = &[u8]> {
    line.chunks(max_fragment.max(1))
}
