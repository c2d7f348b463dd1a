//! Display adapter for embedded-graphics targets
//!
//! Implements the core [`Display`] capability on top of any
//! `DrawTarget<Color = Rgb565>`: SPI TFT panels on the device, or
//! `MockDisplay` on the host.
//!
//! Text uses the 6x10 mono font so the core's layout cell size matches
//! what ends up on the glass. Larger scales are drawn by blowing each font
//! pixel up into a `scale`×`scale` block.

#![no_std]
#![deny(unsafe_code)]

mod scaled;

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use mirror_core::traits::{Color, Display, DisplayError, Rect};

use scaled::Scaled;

/// Panel power switch (backlight, sleep mode)
pub trait PowerControl {
    fn set_powered(&mut self, on: bool) -> Result<(), DisplayError>;
}

/// Power control for panels that are always on
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOn;

impl PowerControl for AlwaysOn {
    fn set_powered(&mut self, _on: bool) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// Convert a core color to the embedded-graphics type
pub fn to_rgb565(color: Color) -> Rgb565 {
    Rgb565::new(color.r(), color.g(), color.b())
}

/// [`Display`] implementation over an embedded-graphics draw target
pub struct GraphicsDisplay<D, P> {
    target: D,
    power: P,
    window: Rectangle,
    powered: bool,
}

impl<D, P> GraphicsDisplay<D, P>
where
    D: DrawTarget<Color = Rgb565>,
    P: PowerControl,
{
    /// Wrap a target that is already initialized and powered
    pub fn new(target: D, power: P) -> Self {
        let window = target.bounding_box();
        Self {
            target,
            power,
            window,
            powered: true,
        }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Give back the target and power control
    pub fn release(self) -> (D, P) {
        (self.target, self.power)
    }

    fn check_powered(&self) -> Result<(), DisplayError> {
        if self.powered {
            Ok(())
        } else {
            Err(DisplayError::PoweredOff)
        }
    }
}

impl<D, P> Display for GraphicsDisplay<D, P>
where
    D: DrawTarget<Color = Rgb565>,
    P: PowerControl,
{
    fn set_draw_window(&mut self, rect: Rect) -> Result<(), DisplayError> {
        let window = Rectangle::new(Point::new(rect.x, rect.y), Size::new(rect.width, rect.height));
        let bounds = self.target.bounding_box();
        let inside = bounds.contains(window.top_left)
            && window
                .bottom_right()
                .map_or(true, |corner| bounds.contains(corner));
        if !inside {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.window = window;
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<(), DisplayError> {
        self.check_powered()?;
        self.target
            .fill_solid(&self.window, to_rgb565(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
        scale: u8,
    ) -> Result<(), DisplayError> {
        self.check_powered()?;
        let bounds = self.target.bounding_box();
        let origin = Point::new(x, y);
        if !bounds.contains(origin) {
            return Err(DisplayError::InvalidCoordinates);
        }

        let style = MonoTextStyle::new(&FONT_6X10, to_rgb565(color));
        let mut clipped = self.target.clipped(&bounds);

        let result = match scale {
            0 | 1 => Text::with_baseline(text, origin, style, Baseline::Top)
                .draw(&mut clipped)
                .map(|_| ()),
            scale => {
                let mut scaled = Scaled::new(&mut clipped, origin, u32::from(scale));
                Text::with_baseline(text, Point::zero(), style, Baseline::Top)
                    .draw(&mut scaled)
                    .map(|_| ())
            }
        };
        result.map_err(|_| DisplayError::Communication)
    }

    fn power_on(&mut self) -> Result<(), DisplayError> {
        self.power.set_powered(true)?;
        self.powered = true;
        Ok(())
    }

    fn power_off(&mut self) -> Result<(), DisplayError> {
        // Refuse draws even if the switch fails
        self.powered = false;
        self.power.set_powered(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[derive(Default)]
    struct CountingPower {
        on: u32,
        off: u32,
    }

    impl PowerControl for CountingPower {
        fn set_powered(&mut self, on: bool) -> Result<(), DisplayError> {
            if on {
                self.on += 1;
            } else {
                self.off += 1;
            }
            Ok(())
        }
    }

    fn mock() -> MockDisplay<Rgb565> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        display
    }

    #[test]
    fn test_fill_respects_window() {
        let mut display = GraphicsDisplay::new(mock(), AlwaysOn);
        display.set_draw_window(Rect::new(2, 2, 4, 4)).unwrap();
        display.fill(Color::WHITE).unwrap();

        let target = display.target();
        assert_eq!(target.get_pixel(Point::new(2, 2)), Some(Rgb565::WHITE));
        assert_eq!(target.get_pixel(Point::new(5, 5)), Some(Rgb565::WHITE));
        assert_eq!(target.get_pixel(Point::new(6, 6)), None);
        assert_eq!(target.get_pixel(Point::new(1, 2)), None);
    }

    #[test]
    fn test_window_outside_panel_is_rejected() {
        let mut display = GraphicsDisplay::new(mock(), AlwaysOn);
        assert_eq!(
            display.set_draw_window(Rect::new(60, 60, 10, 10)),
            Err(DisplayError::InvalidCoordinates)
        );
        assert_eq!(
            display.set_draw_window(Rect::new(-1, 0, 4, 4)),
            Err(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_text_is_drawn_in_color() {
        let mut display = GraphicsDisplay::new(mock(), AlwaysOn);
        display.draw_text("8", 0, 0, Color::AMBER, 1).unwrap();

        let area = display.target().affected_area();
        assert!(area.size.width > 0 && area.size.width <= 6);
        assert!(area.size.height > 0 && area.size.height <= 10);
        assert!(display
            .target()
            .get_pixel(area.center())
            .map_or(true, |c| c == to_rgb565(Color::AMBER)));
    }

    #[test]
    fn test_scaled_text_grows_by_scale() {
        let mut small = GraphicsDisplay::new(mock(), AlwaysOn);
        small.draw_text("8", 0, 0, Color::WHITE, 1).unwrap();
        let small_area = small.target().affected_area();

        let mut large = GraphicsDisplay::new(mock(), AlwaysOn);
        large.draw_text("8", 0, 0, Color::WHITE, 3).unwrap();
        let large_area = large.target().affected_area();

        assert_eq!(large_area.top_left, small_area.top_left * 3);
        assert_eq!(large_area.size, small_area.size * 3);
    }

    #[test]
    fn test_text_origin_outside_panel_is_rejected() {
        let mut display = GraphicsDisplay::new(mock(), AlwaysOn);
        assert_eq!(
            display.draw_text("x", 64, 0, Color::WHITE, 1),
            Err(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_powered_off_refuses_draws() {
        let mut display = GraphicsDisplay::new(mock(), CountingPower::default());
        display.power_off().unwrap();
        assert_eq!(display.fill(Color::BLACK), Err(DisplayError::PoweredOff));
        assert_eq!(
            display.draw_text("x", 0, 0, Color::WHITE, 1),
            Err(DisplayError::PoweredOff)
        );
        // Window changes are still accepted while off
        assert!(display.set_draw_window(Rect::new(0, 0, 8, 8)).is_ok());

        display.power_on().unwrap();
        assert!(display.fill(Color::BLACK).is_ok());

        let (_, power) = display.release();
        assert_eq!((power.on, power.off), (1, 1));
    }
}
