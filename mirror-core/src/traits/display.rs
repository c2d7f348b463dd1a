//! Display capability used by the render scheduler
//!
//! The panel driver itself (init sequences, register writes) lives outside
//! this crate. The scheduler only needs a window, a fill and text.

/// Errors that can occur while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus write failed
    Communication,
    /// Window or text origin outside the panel
    InvalidCoordinates,
    /// Draw attempted while the panel is powered down
    PoweredOff,
}

/// RGB565 color, as sent to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color::rgb565(0, 0, 0);
    pub const WHITE: Color = Color::rgb565(31, 63, 31);
    pub const GRAY: Color = Color::rgb565(12, 24, 12);
    pub const GREEN: Color = Color::rgb565(4, 50, 8);
    pub const AMBER: Color = Color::rgb565(31, 40, 0);

    /// Pack 5/6/5-bit channels; out-of-range bits are masked off
    pub const fn rgb565(r: u8, g: u8, b: u8) -> Self {
        Color((((r & 0x1F) as u16) << 11) | (((g & 0x3F) as u16) << 5) | (b & 0x1F) as u16)
    }

    pub const fn r(&self) -> u8 {
        (self.0 >> 11) as u8 & 0x1F
    }

    pub const fn g(&self) -> u8 {
        (self.0 >> 5) as u8 & 0x3F
    }

    pub const fn b(&self) -> u8 {
        self.0 as u8 & 0x1F
    }
}

/// Pixel rectangle, origin at the top-left corner of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point lies inside the rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && ((x - self.x) as u32) < self.width
            && ((y - self.y) as u32) < self.height
    }
}

/// Trait for the pixel display
///
/// Text uses a fixed 6x10 cell per character, multiplied by `scale`.
/// Each call is independent: the scheduler keeps going when one fails.
pub trait Display {
    /// Restrict subsequent fills to `rect`
    fn set_draw_window(&mut self, rect: Rect) -> Result<(), DisplayError>;

    /// Fill the current draw window
    fn fill(&mut self, color: Color) -> Result<(), DisplayError>;

    /// Draw `text` with its top-left corner at (`x`, `y`)
    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
        scale: u8,
    ) -> Result<(), DisplayError>;

    /// Wake the panel and enable the backlight
    fn power_on(&mut self) -> Result<(), DisplayError>;

    /// Blank the backlight and put the panel to sleep
    fn power_off(&mut self) -> Result<(), DisplayError>;
}
