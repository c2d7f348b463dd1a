//! Radio transmit task
//!
//! Writes module commands and acknowledgement lines to the BLE module.
//! Acks go out in chunks no larger than one notification, and each chunk
//! is only written while the peer is still connected. Once it drops, the
//! rest of the line is discarded; acks are never queued across a
//! disconnect.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use portable_atomic::Ordering;

use mirror_core::link::hm10::AtCommand;
use mirror_protocol::{fragments, AckLine};

use crate::channels::{Outbound, LINK_CONNECTED, OUTBOUND};

/// Pause between chunks so the module sends one per notification
const CHUNK_GAP: Duration = Duration::from_millis(10);

/// Time the module needs to process a command and reply
const COMMAND_SETTLE: Duration = Duration::from_millis(150);

/// Radio transmit task
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx, fragment_size: usize) {
    info!("Link TX task started");

    loop {
        match OUTBOUND.receive().await {
            Outbound::Ack(line) => send_ack(&mut tx, &line, fragment_size).await,
            Outbound::At(command) => send_command(&mut tx, &command).await,
        }
    }
}

/// Send one acknowledgement line, chunk by chunk
async fn send_ack(tx: &mut BufferedUartTx, line: &AckLine, fragment_size: usize) {
    for (index, chunk) in fragments(line, fragment_size).enumerate() {
        if !LINK_CONNECTED.load(Ordering::Acquire) {
            debug!("Peer gone, dropping rest of ack after {} chunks", index);
            return;
        }

        if index > 0 {
            Timer::after(CHUNK_GAP).await;
        }

        if let Err(e) = tx.write_all(chunk).await {
            warn!("Failed to send ack chunk: {:?}", e);
            return;
        }
    }

    trace!("Ack sent ({} bytes)", line.len());
}

/// Send a module command
///
/// While connected the module passes everything through to the peer, so
/// commands are only written when no one is connected.
async fn send_command(tx: &mut BufferedUartTx, command: &AtCommand) {
    if LINK_CONNECTED.load(Ordering::Acquire) {
        warn!("Peer connected, skipping {}", command.as_str());
        return;
    }

    if let Err(e) = tx.write_all(command.as_bytes()).await {
        warn!("Failed to send {}: {:?}", command.as_str(), e);
        return;
    }

    debug!("Sent {}", command.as_str());
    Timer::after(COMMAND_SETTLE).await;
}
