//! Training-curve simulation: reveals a precomputed loss curve one epoch per
//! tick until the scripted early-stopping threshold.
//!
//! The full 30-epoch curve is synthesized once at construction; ticks only
//! grow the visible prefix. Past epoch 24 the simulation freezes permanently
//! in the "stopped" state (the narrative's early stopping) — a scripted
//! threshold, not a real patience algorithm.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use super::clock::{CancelHandle, SimClock};

pub const MAX_EPOCH: usize = 30;
pub const STOP_THRESHOLD_EPOCH: usize = 24;
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

// Epoch past which validation loss starts drifting upward (overfitting).
const OVERFIT_ONSET_EPOCH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochPoint {
    pub epoch: usize,
    pub train_loss: f32,
    pub val_loss: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingCurveFrame {
    pub current_epoch: usize,
    pub max_epoch: usize,
    pub stopped: bool,
    /// Revealed prefix of the curve, length `min(current_epoch, max_epoch)`.
    pub points: Vec<EpochPoint>,
}

/// Exponential-decay recurrence with bounded noise, plus a linear validation
/// drift after the overfitting onset. Matches the narrative's scripted curve.
pub fn synthesize_curve(rng: &mut StdRng) -> Vec<EpochPoint> {
    let mut train = 0.8_f32;
    let mut val = 0.85_f32;
    (1..=MAX_EPOCH)
        .map(|epoch| {
            train = train * 0.85 + rng.gen::<f32>() * 0.05;
            val = val * 0.88 + rng.gen::<f32>() * 0.08;
            if epoch > OVERFIT_ONSET_EPOCH {
                val += 0.02 * (epoch - OVERFIT_ONSET_EPOCH) as f32;
            }
            EpochPoint {
                epoch,
                train_loss: train,
                val_loss: val,
            }
        })
        .collect()
}

pub struct TrainingCurveSim {
    curve: Vec<EpochPoint>,
    current_epoch: usize,
    stopped: bool,
    clock: SimClock<()>,
    tick_handle: CancelHandle,
}

impl TrainingCurveSim {
    pub fn new(now: Instant, rng: &mut StdRng) -> Self {
        let mut clock = SimClock::new();
        let tick_handle = clock.schedule_repeating(now, TICK_INTERVAL, ());
        Self {
            curve: synthesize_curve(rng),
            current_epoch: 1,
            stopped: false,
            clock,
            tick_handle,
        }
    }

    pub fn advance(&mut self, now: Instant) {
        for () in self.clock.poll(now) {
            if self.stopped {
                break;
            }
            self.current_epoch += 1;
            if self.current_epoch > STOP_THRESHOLD_EPOCH {
                self.stopped = true;
                // Terminal state: the repeating timer is canceled so no
                // further reveal can ever happen until teardown.
                self.clock.cancel(self.tick_handle);
            }
        }
    }

    pub fn current_epoch(&self) -> usize {
        self.current_epoch
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn visible_points(&self) -> &[EpochPoint] {
        &self.curve[..self.current_epoch.min(MAX_EPOCH)]
    }

    pub fn frame(&self) -> TrainingCurveFrame {
        TrainingCurveFrame {
            current_epoch: self.current_epoch,
            max_epoch: MAX_EPOCH,
            stopped: self.stopped,
            points: self.visible_points().to_vec(),
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

    fn sim_at(t0: Instant) -> TrainingCurveSim {
        TrainingCurveSim::new(t0, &mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn curve_spans_all_epochs() {
        let curve = synthesize_curve(&mut StdRng::seed_from_u64(1));
        assert_eq!(curve.len(), MAX_EPOCH);
        assert_eq!(curve[0].epoch, 1);
        assert_eq!(curve[MAX_EPOCH - 1].epoch, MAX_EPOCH);
    }

    #[test]
    fn losses_decay_then_validation_drifts_up() {
        let curve = synthesize_curve(&mut StdRng::seed_from_u64(1));
        // Early training: both losses decay well below their first epoch.
        assert!(curve[9].train_loss < curve[0].train_loss);
        assert!(curve[9].val_loss < curve[0].val_loss);
        // Overfitting drift dominates by the end.
        assert!(curve[MAX_EPOCH - 1].val_loss > curve[16].val_loss);
        assert!(curve[MAX_EPOCH - 1].val_loss > curve[MAX_EPOCH - 1].train_loss);
    }

    #[test]
    fn epoch_reveal_is_monotone_until_stop() {
        let t0 = Instant::now();
        let mut sim = sim_at(t0);
        let mut last = sim.current_epoch();
        for k in 1..40u32 {
            sim.advance(t0 + TICK_INTERVAL * k);
            assert!(sim.current_epoch() >= last);
            last = sim.current_epoch();
        }
        assert!(sim.stopped());
    }

    #[test]
    fn stops_once_past_the_threshold_epoch() {
        let t0 = Instant::now();
        let mut sim = sim_at(t0);
        sim.advance(t0 + TICK_INTERVAL * 23);
        assert_eq!(sim.current_epoch(), 24);
        assert!(!sim.stopped());

        sim.advance(t0 + TICK_INTERVAL * 24);
        assert_eq!(sim.current_epoch(), 25);
        assert!(sim.stopped());
        assert_eq!(sim.pending_timers(), 0);

        // Frozen forever after.
        sim.advance(t0 + TICK_INTERVAL * 400);
        assert_eq!(sim.current_epoch(), 25);
        assert!(sim.stopped());
    }

    #[test]
    fn visible_prefix_tracks_current_epoch() {
        let t0 = Instant::now();
        let mut sim = sim_at(t0);
        assert_eq!(sim.visible_points().len(), 1);
        for k in 1..30u32 {
            sim.advance(t0 + TICK_INTERVAL * k);
            assert_eq!(
                sim.visible_points().len(),
                sim.current_epoch().min(MAX_EPOCH),
                "after {k} ticks"
            );
        }
    }

    #[test]
    fn frame_reports_prefix_and_stop_flag() {
        let t0 = Instant::now();
        let mut sim = sim_at(t0);
        sim.advance(t0 + TICK_INTERVAL * 25);
        let frame = sim.frame();
        assert!(frame.stopped);
        assert_eq!(frame.current_epoch, 25);
        assert_eq!(frame.points.len(), 25);
        assert_eq!(frame.max_epoch, MAX_EPOCH);
    }
}
