//! Screen layout derived from the panel size

use crate::config::RenderConfig;
use crate::traits::Rect;

/// Width of one text cell at scale 1 (pixels)
pub const CHAR_WIDTH: u32 = 6;
/// Height of one text cell at scale 1 (pixels)
pub const CHAR_HEIGHT: u32 = 10;

pub const TIME_SCALE: u8 = 4;
pub const DATE_SCALE: u8 = 2;
pub const EVENT_SCALE: u8 = 2;
pub const LABEL_SCALE: u8 = 1;

/// Left/right/top margin (pixels)
const MARGIN: i32 = 8;

/// Top-left corner of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Origin {
    pub x: i32,
    pub y: i32,
}

/// Where each element goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    pub full: Rect,
    /// Link indicator, top-right corner
    pub status: Origin,
    /// Large clock
    pub time_y: i32,
    pub date_y: i32,
    /// "NEXT" caption above the event
    pub label: Origin,
    pub event_time: Origin,
    pub event_name: Origin,
    /// Event names are cut to this many characters
    pub name_max_chars: usize,
}

impl Layout {
    pub fn new(config: &RenderConfig) -> Self {
        let width = u32::from(config.width);
        let height = i32::from(config.height);

        let time_y = height / 6;
        let date_y = time_y + text_height(TIME_SCALE) + 12;
        let label_y = height / 2 + 16;
        let event_time_y = label_y + text_height(LABEL_SCALE) + 4;
        let event_name_y = event_time_y + text_height(EVENT_SCALE) + 4;

        Self {
            full: Rect::new(0, 0, width, u32::from(config.height)),
            status: Origin {
                x: width as i32 - MARGIN - text_width(2, LABEL_SCALE),
                y: MARGIN,
            },
            time_y,
            date_y,
            label: Origin {
                x: MARGIN,
                y: label_y,
            },
            event_time: Origin {
                x: MARGIN,
                y: event_time_y,
            },
            event_name: Origin {
                x: MARGIN,
                y: event_name_y,
            },
            name_max_chars: usize::from(config.name_max_chars),
        }
    }

    /// X coordinate that centers `chars` characters at `scale`
    pub fn centered(&self, chars: usize, scale: u8) -> i32 {
        let free = self.full.width as i32 - text_width(chars, scale);
        (free / 2).max(0)
    }
}

/// Pixel width of `chars` characters at `scale`
pub fn text_width(chars: usize, scale: u8) -> i32 {
    chars as i32 * (CHAR_WIDTH as i32) * i32::from(scale)
}

/// Pixel height of one line at `scale`
pub fn text_height(scale: u8) -> i32 {
    (CHAR_HEIGHT as i32) * i32::from(scale)
}
