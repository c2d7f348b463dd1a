//! Main controller loop
//!
//! Owns the sync engine, the render scheduler, the panel and the clock.
//! Everything that touches the event store or the panel happens here, one
//! step at a time: fragments and link changes from [`DEVICE_EVENTS`], the
//! re-advertise deadline, and the render tick.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Instant, Ticker, Timer};
use portable_atomic::Ordering;

use mirror_core::link::{hm10, Transition};
use mirror_core::render::{RenderScheduler, TickOutcome};
use mirror_core::sync::{Dispatch, LineOutcome, SyncEngine};
use mirror_core::traits::Clock;

use crate::channels::{DeviceEvent, Outbound, DEVICE_EVENTS, DISPLAY_POWERED, OUTBOUND};
use crate::clock::RtcClock;
use crate::panel::MirrorDisplay;

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Sleep until the re-advertise deadline, or forever when there is none
async fn link_deadline(at_ms: Option<u64>) {
    match at_ms {
        Some(at) => Timer::at(Instant::from_millis(at)).await,
        None => core::future::pending().await,
    }
}

pub struct Controller {
    engine: SyncEngine,
    scheduler: RenderScheduler,
    display: MirrorDisplay,
    clock: RtcClock,
    tick_interval: Duration,
}

impl Controller {
    pub fn new(
        engine: SyncEngine,
        scheduler: RenderScheduler,
        display: MirrorDisplay,
        clock: RtcClock,
        tick_interval_ms: u32,
    ) -> Self {
        Self {
            engine,
            scheduler,
            display,
            clock,
            tick_interval: Duration::from_millis(u64::from(tick_interval_ms)),
        }
    }

    /// Run forever
    pub async fn run(mut self) -> ! {
        info!("Controller started");

        if let Some(transition) = self.engine.start(now_ms()) {
            self.on_transition(transition);
        }

        // First frame right away rather than one interval in
        self.render();

        let mut ticker = Ticker::every(self.tick_interval);

        loop {
            let deadline = self.engine.next_link_deadline();

            match select3(
                DEVICE_EVENTS.receive(),
                link_deadline(deadline),
                ticker.next(),
            )
            .await
            {
                Either3::First(DeviceEvent::Fragment(fragment)) => self.on_fragment(&fragment),
                Either3::First(DeviceEvent::Link(event)) => {
                    if let Some(transition) = self.engine.on_link(event, now_ms()) {
                        self.on_transition(transition);
                    }
                }
                Either3::Second(()) => {
                    if let Some(transition) = self.engine.poll_link(now_ms()) {
                        self.on_transition(transition);
                    }
                }
                Either3::Third(()) => self.render(),
            }
        }
    }

    fn on_fragment(&mut self, fragment: &[u8]) {
        let clock = &mut self.clock;
        let lines = self
            .engine
            .receive(fragment, now_ms(), |dispatch| handle_dispatch(dispatch, clock));

        if lines > 0 {
            trace!("{} lines processed", lines);
        }
    }

    fn on_transition(&mut self, transition: Transition) {
        info!("Link {} -> {}", transition.from, transition.to);

        let Some(action) = transition.action else {
            return;
        };
        if let Some(command) = hm10::action_command(action) {
            if OUTBOUND.try_send(Outbound::At(command)).is_err() {
                warn!("Outbound queue full, dropping {}", action);
            }
        }
    }

    /// Apply requested power, then run one scheduler tick
    fn render(&mut self) {
        let powered = DISPLAY_POWERED.load(Ordering::Relaxed);
        if let Err(e) = self
            .scheduler
            .set_power(powered, &mut self.display, &mut self.engine)
        {
            warn!("Display power change failed: {}", e);
        }

        match self
            .scheduler
            .tick(&mut self.engine, &mut self.clock, &mut self.display)
        {
            TickOutcome::Idle => {}
            TickOutcome::Suppressed => trace!("Repaint deferred, display off"),
            TickOutcome::Drawn { failed_calls: 0 } => debug!("Repainted"),
            TickOutcome::Drawn { failed_calls } => {
                warn!("Repainted with {} failed draw calls", failed_calls)
            }
        }
    }
}

/// Log one processed line, apply clock updates and queue its ack
fn handle_dispatch(dispatch: Dispatch, clock: &mut RtcClock) {
    match dispatch.outcome {
        LineOutcome::Synced { count } => info!("Synced {} events", count),
        LineOutcome::Added {
            accepted: true,
            count,
        } => info!("Event added ({} stored)", count),
        LineOutcome::Added {
            accepted: false,
            count,
        } => warn!("Event store full ({}), add ignored", count),
        LineOutcome::Removed { removed, count } => {
            info!("Removed {} events ({} stored)", removed, count)
        }
        LineOutcome::Cleared => info!("Events cleared"),
        LineOutcome::Pong => trace!("Ping"),
        LineOutcome::ClockSet(now) => match clock.set(now) {
            Ok(()) => info!("Clock set to {}", now),
            Err(e) => warn!("Clock rejected {}: {}", now, e),
        },
        LineOutcome::Unknown => debug!("Unknown action ignored"),
        LineOutcome::Rejected(e) => warn!("Dropped line: {}", e),
    }

    match dispatch.reply {
        Some(Ok(line)) => {
            if OUTBOUND.try_send(Outbound::Ack(line)).is_err() {
                warn!("Outbound queue full, dropping ack");
            }
        }
        Some(Err(e)) => warn!("Failed to encode ack: {}", e),
        None => {}
    }
}
