//! Display power button task
//!
//! Samples the button line on a fixed tick and feeds the debouncer. An
//! accepted press flips the requested display power; the controller
//! applies it on its next tick.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::Ordering;

use mirror_core::input::InputMonitor;

use crate::channels::DISPLAY_POWERED;

/// Sample period, well below any sensible debounce window
const SAMPLE_PERIOD: Duration = Duration::from_millis(5);

/// Display power button task
#[embassy_executor::task]
pub async fn button_task(button: Input<'static>, debounce_ms: u32) {
    info!("Button task started");

    let mut ticker = Ticker::every(SAMPLE_PERIOD);
    let mut input = InputMonitor::new(debounce_ms, DISPLAY_POWERED.load(Ordering::Relaxed));

    loop {
        let now_ms = Instant::now().as_millis();

        if let Some(powered) = input.sample(button.is_high(), now_ms) {
            info!("Display power {}", if powered { "on" } else { "off" });
            DISPLAY_POWERED.store(powered, Ordering::Relaxed);
        }

        ticker.next().await;
    }
}
