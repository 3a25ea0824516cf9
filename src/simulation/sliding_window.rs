//! Sliding-window simulation: a fixed-size window marching over a synthetic
//! traffic-speed series, with the "predict this" target one slot past the
//! window's end.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use super::clock::SimClock;

pub const SERIES_LEN: usize = 24;
pub const WINDOW_LEN: usize = 12;
pub const TICK_INTERVAL: Duration = Duration::from_millis(1200);

/// One bar of the timeline as the render surface should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowBar {
    pub value: u32,
    pub in_window: bool,
    pub target: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlidingWindowFrame {
    pub window_start: usize,
    pub target_index: usize,
    pub bars: Vec<WindowBar>,
}

pub struct SlidingWindowSim {
    values: Vec<u32>,
    window_start: usize,
    clock: SimClock<()>,
}

impl SlidingWindowSim {
    /// Synthesizes the series once (smooth oscillation plus bounded noise,
    /// cosmetic data) and starts the repeating slide timer.
    pub fn new(now: Instant, rng: &mut StdRng) -> Self {
        let values = (0..SERIES_LEN)
            .map(|i| {
                let shape = 60.0 - (i as f32 / 3.0).sin() * 20.0;
                (shape - rng.gen::<f32>() * 5.0).round() as u32
            })
            .collect();
        let mut clock = SimClock::new();
        clock.schedule_repeating(now, TICK_INTERVAL, ());
        Self {
            values,
            window_start: 0,
            clock,
        }
    }

    pub fn advance(&mut self, now: Instant) {
        for () in self.clock.poll(now) {
            self.slide();
        }
    }

    // Wraps once the window plus target would run off the series end, so the
    // cycle repeats forever: window_start covers 0..=11.
    fn slide(&mut self) {
        self.window_start = if self.window_start + WINDOW_LEN >= SERIES_LEN - 1 {
            0
        } else {
            self.window_start + 1
        };
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    pub fn target_index(&self) -> usize {
        self.window_start + WINDOW_LEN
    }

    pub fn frame(&self) -> SlidingWindowFrame {
        let target = self.target_index();
        let bars = self
            .values
            .iter()
            .enumerate()
            .map(|(i, &value)| WindowBar {
                value,
                in_window: i >= self.window_start && i < target,
                target: i == target,
            })
            .collect();
        SlidingWindowFrame {
            window_start: self.window_start,
            target_index: target,
            bars,
        }
    }

    pub fn teardown(&mut self) {
        self.clock.cancel_all();
    }

    pub fn pending_timers(&self) -> usize {
        self.clock.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sim_at(t0: Instant) -> SlidingWindowSim {
        SlidingWindowSim::new(t0, &mut StdRng::seed_from_u64(7))
    }

    fn ticked(t0: Instant, ticks: u32) -> SlidingWindowSim {
        let mut sim = sim_at(t0);
        sim.advance(t0 + TICK_INTERVAL * ticks);
        sim
    }

    #[test]
    fn window_start_is_tick_count_mod_wrap_point() {
        let t0 = Instant::now();
        for k in 0..30 {
            let sim = ticked(t0, k);
            assert_eq!(sim.window_start(), k as usize % 12, "after {k} ticks");
        }
    }

    #[test]
    fn target_is_always_one_past_the_window() {
        let t0 = Instant::now();
        for k in 0..14 {
            let sim = ticked(t0, k);
            assert_eq!(sim.target_index(), sim.window_start() + WINDOW_LEN);
        }
    }

    #[test]
    fn wraps_to_zero_after_eleven_slides() {
        let t0 = Instant::now();
        assert_eq!(ticked(t0, 11).window_start(), 11);
        assert_eq!(ticked(t0, 12).window_start(), 0);
    }

    #[test]
    fn frame_flags_window_and_target() {
        let t0 = Instant::now();
        let sim = ticked(t0, 3);
        let frame = sim.frame();
        assert_eq!(frame.bars.len(), SERIES_LEN);
        assert_eq!(frame.window_start, 3);
        assert_eq!(frame.target_index, 15);
        for (i, bar) in frame.bars.iter().enumerate() {
            assert_eq!(bar.in_window, (3..15).contains(&i), "bar {i}");
            assert_eq!(bar.target, i == 15, "bar {i}");
        }
        assert_eq!(frame.bars.iter().filter(|b| b.target).count(), 1);
    }

    #[test]
    fn series_values_stay_in_plausible_speed_band() {
        let t0 = Instant::now();
        let sim = sim_at(t0);
        for bar in sim.frame().bars {
            assert!(bar.value >= 30 && bar.value <= 85, "value {}", bar.value);
        }
    }

    #[test]
    fn teardown_cancels_the_slide_timer() {
        let t0 = Instant::now();
        let mut sim = sim_at(t0);
        sim.teardown();
        assert_eq!(sim.pending_timers(), 0);
        sim.advance(t0 + TICK_INTERVAL * 5);
        assert_eq!(sim.window_start(), 0);
    }
}
