//! Data-cleaning simulation: a scripted two-transition sequence over a small
//! sensor grid. Missing readings (sentinel 0.0) are first shown flagged, then
//! flip to precomputed interpolated values, and finally the cyclic
//! time-feature panel lights up. Terminal at phase 2 until step change.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::clock::SimClock;

pub const FLAG_TO_FILL_DELAY: Duration = Duration::from_millis(2500);
pub const FILL_TO_FEATURES_DELAY: Duration = Duration::from_millis(3000);

/// Sensor readings; 0.0 marks a missing sample.
const GRID: [[f32; 4]; 3] = [
    [55.0, 54.0, 0.0, 52.0],
    [65.0, 0.0, 63.0, 64.0],
    [40.0, 42.0, 45.0, 0.0],
];

// Replacement values are baked per row, not computed: the narrative only
// needs the cells to change, not a real interpolation pass.
const FILLED: [f32; 3] = [53.0, 64.0, 46.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseEvent {
    FillMissing,
    ActivateTimeFeatures,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataCleaningFrame {
    pub phase: u8,
    /// 3x4 grid; `display` is the value the render surface should print.
    pub rows: Vec<Vec<DisplayCell>>,
    pub time_features_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayCell {
    pub display: f32,
    pub missing: bool,
    pub filled: bool,
}

pub struct DataCleaningSim {
    phase: u8,
    clock: SimClock<PhaseEvent>,
}

impl DataCleaningSim {
    pub fn new(now: Instant) -> Self {
        let mut clock = SimClock::new();
        clock.schedule(now, FLAG_TO_FILL_DELAY, PhaseEvent::FillMissing);
        clock.schedule(
            now,
            FLAG_TO_FILL_DELAY + FILL_TO_FEATURES_DELAY,
            PhaseEvent::ActivateTimeFeatures,
        );
        Self { phase: 0, clock }
    }

    pub fn advance(&mut self, now: Instant) {
        for event in self.clock.poll(now) {
            match event {
                PhaseEvent::FillMissing => self.phase = self.phase.max(1),
                PhaseEvent::ActivateTimeFeatures => self.phase = 2,
            }
        }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn frame(&self) -> DataCleaningFrame {
        let rows = GRID
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .map(|&raw| {
                        let missing = raw == 0.0;
                        let filled = missing && self.phase >= 1;
                        DisplayCell {
                            display: if filled { FILLED[r] } else { raw },
                            missing,
                            filled,
                        }
                    })
                    .collect()
            })
            .collect();
        DataCleaningFrame {
            phase: self.phase,
            rows,
            time_features_active: self.phase >= 2,
        }
    }

    pub fn teardown(&mut self) {
        self.clock.cancel_all();
    }

    pub fn pending_timers(&self) -> usize {
        self.clock.pending()
    }
}
