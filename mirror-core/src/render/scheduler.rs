//! Render scheduler

use mirror_protocol::TimeOfDay;

use super::layout::{Layout, DATE_SCALE, EVENT_SCALE, LABEL_SCALE, TIME_SCALE};
use super::text::{clock_text, date_text, time_text, truncate_chars, NO_EVENTS};
use crate::config::RenderConfig;
use crate::sync::{Snapshot, SyncEngine};
use crate::traits::{Clock, Color, Display, DisplayError};

const BACKGROUND: Color = Color::BLACK;

/// Result of one scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Nothing changed since the last repaint
    Idle,
    /// A repaint is due but the display is powered off
    Suppressed,
    /// Full repaint issued; some draw calls may have failed
    Drawn { failed_calls: u8 },
}

/// Decides when to repaint and issues the draw calls
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    layout: Layout,
    powered: bool,
    /// Minute shown by the last repaint. Outer `None`: nothing drawn yet;
    /// inner `None`: drawn without a clock.
    last_drawn: Option<Option<TimeOfDay>>,
}

impl RenderScheduler {
    /// Create a scheduler for a panel that starts powered on
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            layout: Layout::new(config),
            powered: true,
            last_drawn: None,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    /// Apply the requested display power state
    ///
    /// Calls `power_on`/`power_off` once per change and nothing otherwise.
    /// Powering on forces a repaint on the next tick. The new state is
    /// recorded even if the call fails.
    pub fn set_power<D: Display, const N: usize>(
        &mut self,
        powered: bool,
        display: &mut D,
        engine: &mut SyncEngine<N>,
    ) -> Result<(), DisplayError> {
        if powered == self.powered {
            return Ok(());
        }
        self.powered = powered;

        if powered {
            engine.request_redraw();
            display.power_on()
        } else {
            display.power_off()
        }
    }

    /// Run one iteration of the render loop
    pub fn tick<C: Clock, D: Display, const N: usize>(
        &mut self,
        engine: &mut SyncEngine<N>,
        clock: &mut C,
        display: &mut D,
    ) -> TickOutcome {
        let now = clock.now();
        let minute = now.map(|dt| dt.time);

        let due = engine.redraw_requested() || self.last_drawn != Some(minute);
        if !due {
            return TickOutcome::Idle;
        }
        if !self.powered {
            // Keep the forced flag so pending changes show on power-up
            return TickOutcome::Suppressed;
        }

        let failed_calls = self.draw(&engine.snapshot(now), display);
        engine.clear_redraw();
        self.last_drawn = Some(minute);

        TickOutcome::Drawn { failed_calls }
    }

    /// Repaint the whole screen; returns the number of failed calls
    fn draw<D: Display>(&self, snapshot: &Snapshot<'_>, display: &mut D) -> u8 {
        let layout = &self.layout;
        let mut painter = Painter::new(display);

        painter.run(|d| d.set_draw_window(layout.full));
        painter.run(|d| d.fill(BACKGROUND));

        let status = if snapshot.connected {
            Color::GREEN
        } else {
            Color::GRAY
        };
        painter.text("BT", layout.status.x, layout.status.y, status, LABEL_SCALE);

        let clock = clock_text(snapshot.now.as_ref());
        painter.text(
            &clock,
            layout.centered(clock.chars().count(), TIME_SCALE),
            layout.time_y,
            Color::WHITE,
            TIME_SCALE,
        );

        let date = date_text(snapshot.now.as_ref());
        painter.text(
            &date,
            layout.centered(date.chars().count(), DATE_SCALE),
            layout.date_y,
            Color::GRAY,
            DATE_SCALE,
        );

        painter.text("NEXT", layout.label.x, layout.label.y, Color::GRAY, LABEL_SCALE);

        match snapshot.next {
            Some(event) => {
                painter.text(
                    &time_text(event.time),
                    layout.event_time.x,
                    layout.event_time.y,
                    Color::AMBER,
                    EVENT_SCALE,
                );
                painter.text(
                    truncate_chars(&event.name, layout.name_max_chars),
                    layout.event_name.x,
                    layout.event_name.y,
                    Color::WHITE,
                    EVENT_SCALE,
                );
            }
            None => painter.text(
                NO_EVENTS,
                layout.event_time.x,
                layout.event_time.y,
                Color::GRAY,
                EVENT_SCALE,
            ),
        }

        painter.failed
    }
}

/// Issues draw calls and counts the ones that fail
struct Painter<'a, D> {
    display: &'a mut D,
    failed: u8,
}

impl<'a, D: Display> Painter<'a, D> {
    fn new(display: &'a mut D) -> Self {
        Self { display, failed: 0 }
    }

    fn run<F>(&mut self, call: F)
    where
        F: FnOnce(&mut D) -> Result<(), DisplayError>,
    {
        if call(&mut *self.display).is_err() {
            self.failed = self.failed.saturating_add(1);
        }
    }

    fn text(&mut self, text: &str, x: i32, y: i32, color: Color, scale: u8) {
        self.run(|d| d.draw_text(text, x, y, color, scale));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;
    use crate::traits::{ClockError, Rect};
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use mirror_protocol::{Date, DateTime};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Window(Rect),
        Fill(Color),
        Text(String),
        PowerOn,
        PowerOff,
    }

    #[derive(Default)]
    struct FakeDisplay {
        calls: Vec<Call>,
        fail_text: bool,
    }

    impl Display for FakeDisplay {
        fn set_draw_window(&mut self, rect: Rect) -> Result<(), DisplayError> {
            self.calls.push(Call::Window(rect));
            Ok(())
        }

        fn fill(&mut self, color: Color) -> Result<(), DisplayError> {
            self.calls.push(Call::Fill(color));
            Ok(())
        }

        fn draw_text(
            &mut self,
            text: &str,
            _x: i32,
            _y: i32,
            _color: Color,
            _scale: u8,
        ) -> Result<(), DisplayError> {
            self.calls.push(Call::Text(text.to_string()));
            if self.fail_text {
                Err(DisplayError::Communication)
            } else {
                Ok(())
            }
        }

        fn power_on(&mut self) -> Result<(), DisplayError> {
            self.calls.push(Call::PowerOn);
            Ok(())
        }

        fn power_off(&mut self) -> Result<(), DisplayError> {
            self.calls.push(Call::PowerOff);
            Ok(())
        }
    }

    struct FakeClock(Option<DateTime>);

    impl Clock for FakeClock {
        fn now(&mut self) -> Option<DateTime> {
            self.0
        }

        fn set(&mut self, now: DateTime) -> Result<(), ClockError> {
            self.0 = Some(now);
            Ok(())
        }
    }

    fn at(hour: u8, minute: u8, second: u8) -> Option<DateTime> {
        Some(
            DateTime::new(
                Date::new(2026, 10, 16).unwrap(),
                TimeOfDay::new(hour, minute).unwrap(),
                second,
            )
            .unwrap(),
        )
    }

    fn setup() -> (RenderScheduler, SyncEngine, FakeDisplay) {
        (
            RenderScheduler::new(&RenderConfig::default()),
            SyncEngine::new(&LinkConfig::default()),
            FakeDisplay::default(),
        )
    }

    fn texts(display: &FakeDisplay) -> Vec<&str> {
        display
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_first_tick_draws_everything() {
        let (mut scheduler, mut engine, mut display) = setup();
        let mut clock = FakeClock(at(8, 30, 0));

        let outcome = scheduler.tick(&mut engine, &mut clock, &mut display);
        assert_eq!(outcome, TickOutcome::Drawn { failed_calls: 0 });
        assert_eq!(display.calls[0], Call::Window(Rect::new(0, 0, 240, 240)));
        assert_eq!(display.calls[1], Call::Fill(Color::BLACK));
        assert_eq!(
            texts(&display),
            ["BT", "08:30", "Fri 16 Oct 2026", "NEXT", "No events"]
        );
        assert!(!engine.redraw_requested());
    }

    #[test]
    fn test_same_minute_is_idle() {
        let (mut scheduler, mut engine, mut display) = setup();
        let mut clock = FakeClock(at(8, 30, 0));
        scheduler.tick(&mut engine, &mut clock, &mut display);
        display.calls.clear();

        clock.0 = at(8, 30, 59);
        assert_eq!(
            scheduler.tick(&mut engine, &mut clock, &mut display),
            TickOutcome::Idle
        );
        assert!(display.calls.is_empty());

        clock.0 = at(8, 31, 0);
        assert!(matches!(
            scheduler.tick(&mut engine, &mut clock, &mut display),
            TickOutcome::Drawn { .. }
        ));
    }

    #[test]
    fn test_forced_redraw_within_minute() {
        let (mut scheduler, mut engine, mut display) = setup();
        let mut clock = FakeClock(at(8, 30, 0));
        scheduler.tick(&mut engine, &mut clock, &mut display);

        engine.request_redraw();
        assert!(matches!(
            scheduler.tick(&mut engine, &mut clock, &mut display),
            TickOutcome::Drawn { .. }
        ));
    }

    #[test]
    fn test_missing_clock_draws_placeholders_once() {
        let (mut scheduler, mut engine, mut display) = setup();
        let mut clock = FakeClock(None);
        scheduler.tick(&mut engine, &mut clock, &mut display);
        let shown = texts(&display);
        assert!(shown.contains(&"--:--"));
        assert!(shown.contains(&"No clock"));

        assert_eq!(
            scheduler.tick(&mut engine, &mut clock, &mut display),
            TickOutcome::Idle
        );
    }

    #[test]
    fn test_failed_calls_do_not_stop_repaint() {
        let (mut scheduler, mut engine, mut display) = setup();
        display.fail_text = true;
        let mut clock = FakeClock(at(9, 0, 0));

        let outcome = scheduler.tick(&mut engine, &mut clock, &mut display);
        assert_eq!(outcome, TickOutcome::Drawn { failed_calls: 5 });
        assert_eq!(texts(&display).len(), 5);
        assert!(!engine.redraw_requested());
    }

    #[test]
    fn test_power_off_suppresses_and_keeps_flag() {
        let (mut scheduler, mut engine, mut display) = setup();
        let mut clock = FakeClock(at(9, 0, 0));
        scheduler.tick(&mut engine, &mut clock, &mut display);

        scheduler.set_power(false, &mut display, &mut engine).unwrap();
        display.calls.clear();

        engine.request_redraw();
        assert_eq!(
            scheduler.tick(&mut engine, &mut clock, &mut display),
            TickOutcome::Suppressed
        );
        assert!(display.calls.is_empty());
        assert!(engine.redraw_requested());

        // Flag survives repeated ticks while off
        assert_eq!(
            scheduler.tick(&mut engine, &mut clock, &mut display),
            TickOutcome::Suppressed
        );
    }

    #[test]
    fn test_power_calls_issued_once_per_change() {
        let (mut scheduler, mut engine, mut display) = setup();
        scheduler.set_power(true, &mut display, &mut engine).unwrap();
        assert!(display.calls.is_empty());

        scheduler.set_power(false, &mut display, &mut engine).unwrap();
        scheduler.set_power(false, &mut display, &mut engine).unwrap();
        assert_eq!(display.calls, [Call::PowerOff]);

        engine.clear_redraw();
        scheduler.set_power(true, &mut display, &mut engine).unwrap();
        assert_eq!(display.calls, [Call::PowerOff, Call::PowerOn]);
        assert!(engine.redraw_requested());
    }

    #[test]
    fn test_power_on_repaints_same_minute() {
        let (mut scheduler, mut engine, mut display) = setup();
        let mut clock = FakeClock(at(9, 0, 0));
        scheduler.tick(&mut engine, &mut clock, &mut display);
        scheduler.set_power(false, &mut display, &mut engine).unwrap();
        assert_eq!(
            scheduler.tick(&mut engine, &mut clock, &mut display),
            TickOutcome::Idle
        );

        scheduler.set_power(true, &mut display, &mut engine).unwrap();
        assert!(matches!(
            scheduler.tick(&mut engine, &mut clock, &mut display),
            TickOutcome::Drawn { .. }
        ));
    }
}
