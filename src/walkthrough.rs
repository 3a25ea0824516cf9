//! Walkthrough controller: owns the active step index and, exclusively, the
//! one live simulation bound to it.
//!
//! Every transition is an ownership handoff: the outgoing simulation is torn
//! down (all of its timers canceled synchronously) before the incoming one is
//! constructed, so a stale tick can never mutate a state that is no longer on
//! screen.

use std::time::Instant;

use rand::rngs::StdRng;
use serde::Serialize;

use crate::registry::{SimulationKind, StepDefinition, StepRegistry};
use crate::simulation::architecture::{ArchitectureFrame, ArchitectureHighlightSim};
use crate::simulation::data_cleaning::{DataCleaningFrame, DataCleaningSim};
use crate::simulation::sliding_window::{SlidingWindowFrame, SlidingWindowSim};
use crate::simulation::training_curve::{TrainingCurveFrame, TrainingCurveSim};

/// The one live simulation, tagged by kind. Static steps hold no simulation.
pub enum ActiveSimulation {
    SlidingWindow(SlidingWindowSim),
    DataCleaning(DataCleaningSim),
    Architecture(ArchitectureHighlightSim),
    TrainingCurve(TrainingCurveSim),
}

impl ActiveSimulation {
    fn advance(&mut self, now: Instant) {
        match self {
            ActiveSimulation::SlidingWindow(sim) => sim.advance(now),
            ActiveSimulation::DataCleaning(sim) => sim.advance(now),
            ActiveSimulation::Architecture(sim) => sim.advance(now),
            ActiveSimulation::TrainingCurve(sim) => sim.advance(now),
        }
    }

    fn teardown(&mut self) {
        match self {
            ActiveSimulation::SlidingWindow(sim) => sim.teardown(),
            ActiveSimulation::DataCleaning(sim) => sim.teardown(),
            ActiveSimulation::Architecture(sim) => sim.teardown(),
            ActiveSimulation::TrainingCurve(sim) => sim.teardown(),
        }
    }

    fn frame(&self) -> SimulationFrame {
        match self {
            ActiveSimulation::SlidingWindow(sim) => SimulationFrame::SlidingWindow(sim.frame()),
            ActiveSimulation::DataCleaning(sim) => SimulationFrame::DataCleaning(sim.frame()),
            ActiveSimulation::Architecture(sim) => SimulationFrame::Architecture(sim.frame()),
            ActiveSimulation::TrainingCurve(sim) => SimulationFrame::TrainingCurve(sim.frame()),
        }
    }

    fn kind(&self) -> SimulationKind {
        match self {
            ActiveSimulation::SlidingWindow(_) => SimulationKind::SlidingWindow,
            ActiveSimulation::DataCleaning(_) => SimulationKind::DataCleaning,
            ActiveSimulation::Architecture(_) => SimulationKind::ArchitectureHighlight,
            ActiveSimulation::TrainingCurve(_) => SimulationKind::TrainingCurve,
        }
    }
}

/// Read-only render data for the active simulation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum SimulationFrame {
    SlidingWindow(SlidingWindowFrame),
    DataCleaning(DataCleaningFrame),
    Architecture(ArchitectureFrame),
    TrainingCurve(TrainingCurveFrame),
}

/// Everything the render surface needs for one frame of the right panel.
#[derive(Debug, Clone, Serialize)]
pub struct WalkthroughFrame {
    pub step_id: usize,
    pub title: String,
    pub simulation: Option<SimulationFrame>,
}

pub struct WalkthroughController {
    registry: StepRegistry,
    active: usize,
    simulation: Option<ActiveSimulation>,
    rng: StdRng,
}

impl WalkthroughController {
    /// `start_step` is clamped into the registry, matching the tolerant
    /// navigation contract.
    pub fn new(registry: StepRegistry, start_step: usize, rng: StdRng, now: Instant) -> Self {
        let active = start_step.min(registry.last_index());
        let mut controller = Self {
            registry,
            active,
            simulation: None,
            rng,
        };
        controller.spawn_simulation(now);
        controller
    }

    pub fn step_count(&self) -> usize {
        self.registry.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn current_step(&self) -> &StepDefinition {
        // The index invariant makes this infallible.
        &self.registry.steps()[self.active]
    }

    pub fn at_first_step(&self) -> bool {
        self.active == 0
    }

    pub fn at_last_step(&self) -> bool {
        self.active == self.registry.last_index()
    }

    /// Advances to the next step; no-op at the last one.
    pub fn go_to_next(&mut self, now: Instant) {
        if self.at_last_step() {
            return;
        }
        self.transition_to(self.active + 1, now);
    }

    /// Retreats to the previous step; no-op at the first one.
    pub fn go_to_previous(&mut self, now: Instant) {
        if self.at_first_step() {
            return;
        }
        self.transition_to(self.active - 1, now);
    }

    fn transition_to(&mut self, index: usize, now: Instant) {
        self.teardown_simulation();
        self.active = index;
        self.spawn_simulation(now);
        log::info!(
            "step {}/{}: {}",
            self.active,
            self.registry.last_index(),
            self.current_step().title
        );
    }

    fn teardown_simulation(&mut self) {
        if let Some(sim) = self.simulation.as_mut() {
            sim.teardown();
        }
        self.simulation = None;
    }

    fn spawn_simulation(&mut self, now: Instant) {
        debug_assert!(self.simulation.is_none());
        self.simulation = match self.current_step().kind {
            SimulationKind::None => None,
            SimulationKind::SlidingWindow => Some(ActiveSimulation::SlidingWindow(
                SlidingWindowSim::new(now, &mut self.rng),
            )),
            SimulationKind::DataCleaning => {
                Some(ActiveSimulation::DataCleaning(DataCleaningSim::new(now)))
            }
            SimulationKind::ArchitectureHighlight => Some(ActiveSimulation::Architecture(
                ArchitectureHighlightSim::new(now),
            )),
            SimulationKind::TrainingCurve => Some(ActiveSimulation::TrainingCurve(
                TrainingCurveSim::new(now, &mut self.rng),
            )),
        };
    }

    /// Applies all ticks due at `now` to the live simulation, if any.
    pub fn advance(&mut self, now: Instant) {
        if let Some(sim) = self.simulation.as_mut() {
            sim.advance(now);
        }
    }

    pub fn has_live_simulation(&self) -> bool {
        self.simulation.is_some()
    }

    /// The live simulation's kind, for invariant checks and the inspector.
    pub fn live_simulation_kind(&self) -> SimulationKind {
        self.simulation
            .as_ref()
            .map_or(SimulationKind::None, ActiveSimulation::kind)
    }

    pub fn frame(&self) -> WalkthroughFrame {
        let step = self.current_step();
        WalkthroughFrame {
            step_id: step.id,
            title: step.title.clone(),
            simulation: self.simulation.as_ref().map(ActiveSimulation::frame),
        }
    }
}
