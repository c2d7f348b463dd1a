//! Button input
//!
//! A momentary switch to ground with the internal pull-up enabled, so the
//! line reads low while pressed. One accepted press toggles display power.
//! Nothing here touches the link or the event store.

/// Time-based debouncer for one digital line
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Last accepted level
    stable: bool,
    /// Candidate level and when it was first seen (ms)
    pending: Option<(bool, u64)>,
    debounce_ms: u32,
}

impl Debouncer {
    pub fn new(initial: bool, debounce_ms: u32) -> Self {
        Self {
            stable: initial,
            pending: None,
            debounce_ms,
        }
    }

    pub fn level(&self) -> bool {
        self.stable
    }

    /// Feed one sample
    ///
    /// Returns the new level once a change has held for the full debounce
    /// window. A bounce back to the accepted level restarts the window.
    pub fn update(&mut self, level: bool, now_ms: u64) -> Option<bool> {
        if level == self.stable {
            self.pending = None;
            return None;
        }

        let since = match self.pending {
            Some((pending, since)) if pending == level => since,
            _ => {
                self.pending = Some((level, now_ms));
                now_ms
            }
        };

        if now_ms.saturating_sub(since) >= u64::from(self.debounce_ms) {
            self.stable = level;
            self.pending = None;
            Some(level)
        } else {
            None
        }
    }
}

/// Turns raw button samples into display power toggles
#[derive(Debug, Clone)]
pub struct InputMonitor {
    /// Debounced "pressed" state
    button: Debouncer,
    powered: bool,
}

impl InputMonitor {
    /// Create a monitor with the button released and the display `powered`
    pub fn new(debounce_ms: u32, powered: bool) -> Self {
        Self {
            button: Debouncer::new(false, debounce_ms),
            powered,
        }
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    /// Feed one sample of the raw line level (`true` = high)
    ///
    /// Returns the new power state when an accepted press toggles it.
    /// Releases are debounced too but never toggle.
    pub fn sample(&mut self, line_high: bool, now_ms: u64) -> Option<bool> {
        let pressed = !line_high;
        match self.button.update(pressed, now_ms) {
            Some(true) => {
                self.powered = !self.powered;
                Some(self.powered)
            }
            _ => None,
        }
    }
}
