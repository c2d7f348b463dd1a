//! ST7789 panel wiring
//!
//! 240x240 IPS module on SPI0 with a GPIO-switched backlight. Powering
//! off only darkens the backlight; the controller keeps its frame memory.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;

use mirror_core::traits::DisplayError;
use mirror_display::{GraphicsDisplay, PowerControl};

type PanelSpi = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, NoDelay>;

/// Initialized mipidsi driver
pub type Panel =
    mipidsi::Display<SpiInterface<'static, PanelSpi, Output<'static>>, ST7789, Output<'static>>;

/// Panel as seen by the render scheduler
pub type MirrorDisplay = GraphicsDisplay<Panel, Backlight>;

/// Backlight enable line (active high)
pub struct Backlight {
    pin: Output<'static>,
}

impl Backlight {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl PowerControl for Backlight {
    fn set_powered(&mut self, on: bool) -> Result<(), DisplayError> {
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        Ok(())
    }
}
