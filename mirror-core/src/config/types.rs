//! Configuration type definitions

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum advertised name prefix length
pub const MAX_PREFIX_LEN: usize = 16;

/// Default advertised name prefix
pub const DEFAULT_NAME_PREFIX: &str = "Mirror";

/// Wireless link settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Advertised name prefix; the device suffix is appended
    pub name_prefix: String<MAX_PREFIX_LEN>,
    /// Delay after a disconnect before advertising again (ms)
    pub readvertise_delay_ms: u32,
    /// Largest outbound chunk (bytes)
    pub fragment_size: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            name_prefix: String::try_from(DEFAULT_NAME_PREFIX).unwrap_or_default(),
            readvertise_delay_ms: 500,
            fragment_size: mirror_protocol::DEFAULT_FRAGMENT_SIZE,
        }
    }
}

/// Panel and repaint settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderConfig {
    /// Render loop period (ms)
    pub tick_interval_ms: u32,
    /// Panel width (pixels)
    pub width: u16,
    /// Panel height (pixels)
    pub height: u16,
    /// Event names longer than this are cut when drawn
    pub name_max_chars: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            width: 240,
            height: 240,
            name_max_chars: 18,
        }
    }
}

/// Button settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputConfig {
    /// How long a level must hold before it is accepted (ms)
    pub debounce_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { debounce_ms: 30 }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MirrorConfig {
    pub link: LinkConfig,
    pub render: RenderConfig,
    pub input: InputConfig,
}

impl MirrorConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
