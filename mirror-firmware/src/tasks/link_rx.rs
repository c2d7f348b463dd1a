//! Radio receive task
//!
//! Reads raw bytes from the BLE module UART and forwards them to the
//! controller in arrival order. Framing happens in the sync engine.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use portable_atomic::Ordering;

use crate::channels::{DeviceEvent, Fragment, DEVICE_EVENTS, LINK_CONNECTED, RX_CHUNK};

/// Radio receive task
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut buf = [0u8; RX_CHUNK];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        if n == 0 {
            continue;
        }

        // Replies to AT commands only arrive while no peer is connected
        if !LINK_CONNECTED.load(Ordering::Acquire) {
            trace!("Module reply: {=[u8]:a}", &buf[..n]);
            continue;
        }

        let mut fragment = Fragment::new();
        // n never exceeds RX_CHUNK
        let _ = fragment.extend_from_slice(&buf[..n]);

        // Wait rather than drop: losing a fragment corrupts the line
        DEVICE_EVENTS.send(DeviceEvent::Fragment(fragment)).await;
    }
}
