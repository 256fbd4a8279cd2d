//! Frame timing and the cancellable frame loop.
//!
//! The browser drives frames through `requestAnimationFrame`; native tests drive the
//! same loop body through [`run_frames`] with a fixed list of timestamps.

use std::cell::Cell;
use std::rc::Rc;

/// Converts monotonic timestamps (ms) into clamped step sizes.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt_ms: f64,
}

impl FrameClock {
    pub fn new(max_dt_ms: f64) -> Self {
        Self { last_ms: None, max_dt_ms }
    }

    /// Clock whose first tick measures from `now` (e.g. `performance.now()` at start).
    pub fn starting_at(now: f64, max_dt_ms: f64) -> Self {
        Self { last_ms: Some(now), max_dt_ms }
    }

    /// Step since the previous tick, clamped to `0..=max_dt_ms`. Long pauses (a
    /// backgrounded tab) collapse to a single max step; rAF timestamps that land
    /// slightly before the start time give 0. A negative cap yields 0 every frame.
    pub fn tick(&mut self, now: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) => (now - last).min(self.max_dt_ms).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now);
        dt
    }

    pub fn max_dt_ms(&self) -> f64 {
        self.max_dt_ms
    }
}

/// Shared stop flag for a frame loop. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Runs `on_frame(dt)` once per timestamp until the timestamps run out or the token
/// is cancelled. Cancellation is checked before every frame, so a frame that
/// cancels is the last one run. Returns the number of frames executed.
pub fn run_frames<I, F>(timestamps: I, clock: &mut FrameClock, cancel: &CancelToken, mut on_frame: F) -> usize
where
    I: IntoIterator<Item = f64>,
    F: FnMut(f64),
{
    let mut frames = 0;
    for now in timestamps {
        if cancel.is_cancelled() {
            break;
        }
        on_frame(clock.tick(now));
        frames += 1;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_without_start_is_zero() {
        let mut clock = FrameClock::new(50.0);
        assert_eq!(clock.tick(1234.0), 0.0);
        assert_eq!(clock.tick(1250.0), 16.0);
    }

    #[test]
    fn clamps_long_gaps_and_backwards_time() {
        let mut clock = FrameClock::starting_at(0.0, 50.0);
        assert_eq!(clock.tick(10_000.0), 50.0);
        assert_eq!(clock.tick(9_990.0), 0.0);
        assert_eq!(clock.tick(10_010.0), 20.0);
    }

    #[test]
    fn step_cap_is_reported_and_never_panics() {
        let clock = FrameClock::new(33.0);
        assert_eq!(clock.max_dt_ms(), 33.0);

        let mut broken = FrameClock::starting_at(0.0, -1.0);
        assert_eq!(broken.max_dt_ms(), -1.0);
        assert_eq!(broken.tick(16.0), 0.0);
        assert_eq!(broken.tick(10.0), 0.0);
    }

    #[test]
    fn run_frames_is_bounded_by_input() {
        let mut clock = FrameClock::starting_at(0.0, 50.0);
        let cancel = CancelToken::new();
        let mut dts = Vec::new();
        let ran = run_frames([16.0, 32.0, 48.0, 200.0], &mut clock, &cancel, |dt| dts.push(dt));
        assert_eq!(ran, 4);
        assert_eq!(dts, vec![16.0, 16.0, 16.0, 50.0]);
    }

    #[test]
    fn cancel_stops_after_current_frame() {
        let mut clock = FrameClock::new(50.0);
        let cancel = CancelToken::new();
        let handle = cancel.clone();
        let mut seen = 0;
        let ran = run_frames((0..100).map(|i| i as f64 * 16.0), &mut clock, &cancel, |_| {
            seen += 1;
            if seen == 3 {
                handle.cancel();
            }
        });
        assert_eq!(ran, 3);
        assert!(cancel.is_cancelled());
    }
}
