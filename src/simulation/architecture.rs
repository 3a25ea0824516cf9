//! Architecture simulation: cycles emphasis through the four stages of the
//! model pipeline forever. No terminal state.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::clock::SimClock;

pub const STAGE_COUNT: usize = 4;
pub const TICK_INTERVAL: Duration = Duration::from_millis(2000);

/// Fixed pipeline, input to output.
pub const STAGES: [StageInfo; STAGE_COUNT] = [
    StageInfo {
        name: "Input Window",
        detail: "[12 hours, N sensors]",
    },
    StageInfo {
        name: "CNN Layer",
        detail: "Scans local sensors for immediate bottlenecks",
    },
    StageInfo {
        name: "GRU Layers",
        detail: "Carries trends forward through time",
    },
    StageInfo {
        name: "Dense Head",
        detail: "Traffic prediction for hour 13",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    pub name: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageStatus {
    pub info: StageInfo,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureFrame {
    pub active_node: usize,
    pub stages: Vec<StageStatus>,
}

pub struct ArchitectureHighlightSim {
    active_node: usize,
    clock: SimClock<()>,
}

impl ArchitectureHighlightSim {
    pub fn new(now: Instant) -> Self {
        let mut clock = SimClock::new();
        clock.schedule_repeating(now, TICK_INTERVAL, ());
        Self {
            active_node: 0,
            clock,
        }
    }

    pub fn advance(&mut self, now: Instant) {
        for () in self.clock.poll(now) {
            self.active_node = (self.active_node + 1) % STAGE_COUNT;
        }
    }

    pub fn active_node(&self) -> usize {
        self.active_node
    }

    pub fn frame(&self) -> ArchitectureFrame {
        ArchitectureFrame {
            active_node: self.active_node,
            stages: STAGES
                .iter()
                .enumerate()
                .map(|(i, &info)| StageStatus {
                    info,
                    active: i == self.active_node,
                })
                .collect(),
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

    #[test]
    fn active_node_cycles_modulo_four() {
        let t0 = Instant::now();
        for k in 0..10u32 {
            let mut sim = ArchitectureHighlightSim::new(t0);
            sim.advance(t0 + TICK_INTERVAL * k);
            assert_eq!(sim.active_node(), k as usize % 4, "after {k} ticks");
        }
    }

    #[test]
    fn exactly_one_stage_is_active() {
        let t0 = Instant::now();
        let mut sim = ArchitectureHighlightSim::new(t0);
        sim.advance(t0 + TICK_INTERVAL * 5);
        let frame = sim.frame();
        assert_eq!(frame.stages.len(), STAGE_COUNT);
        assert_eq!(frame.stages.iter().filter(|s| s.active).count(), 1);
        assert!(frame.stages[frame.active_node].active);
    }

    #[test]
    fn teardown_stops_the_cycle() {
        let t0 = Instant::now();
        let mut sim = ArchitectureHighlightSim::new(t0);
        sim.teardown();
        assert_eq!(sim.pending_timers(), 0);
        sim.advance(t0 + TICK_INTERVAL * 3);
        assert_eq!(sim.active_node(), 0);
    }
}
