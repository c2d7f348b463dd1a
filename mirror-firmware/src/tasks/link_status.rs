//! Link status task
//!
//! Samples the module's STATE pin (high while a central is connected) and
//! turns filtered level changes into link events for the controller.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::Ordering;

use mirror_core::link::{LinkEvent, StateLine};

use crate::channels::{DeviceEvent, DEVICE_EVENTS, LINK_CONNECTED};

const SAMPLE_PERIOD: Duration = Duration::from_millis(20);

/// Longer than the 500 ms high phase STATE blinks with while advertising,
/// in case the module never took `AT+PIO11`
const CONNECT_HOLD_MS: u32 = 700;

const DISCONNECT_HOLD_MS: u32 = 50;

/// Link status task
#[embassy_executor::task]
pub async fn link_status_task(state_pin: Input<'static>) {
    info!("Link status task started");

    let mut ticker = Ticker::every(SAMPLE_PERIOD);
    let mut line = StateLine::new(CONNECT_HOLD_MS, DISCONNECT_HOLD_MS);

    loop {
        let now_ms = Instant::now().as_millis();

        if let Some(event) = line.sample(state_pin.is_high(), now_ms) {
            // Stop outgoing chunks before the controller catches up
            LINK_CONNECTED.store(line.connected(), Ordering::Release);

            match event {
                LinkEvent::PeerConnected => info!("Peer connected"),
                _ => info!("Peer disconnected"),
            }
            DEVICE_EVENTS.send(DeviceEvent::Link(event)).await;
        }

        ticker.next().await;
    }
}
