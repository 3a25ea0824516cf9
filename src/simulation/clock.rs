//! Cancelable timer queue driving every step simulation.
//!
//! The UI runs a single cooperative thread: each frame the app polls the
//! active simulation's clock with the current instant and applies whatever
//! ticks came due. Timers carry a caller-supplied event value rather than a
//! closure, so firing never needs to borrow simulation state — `poll` returns
//! the due events in firing order and the simulation applies them itself.
//!
//! Time is always injected by the caller, never sampled here, which keeps
//! simulations deterministic under test.

use std::time::{Duration, Instant};

/// Opaque handle to a scheduled timer.
///
/// Canceling a handle that already fired (or was never issued by this clock)
/// is a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelHandle(u64);

#[derive(Debug)]
struct Timer<E> {
    id: u64,
    due: Instant,
    repeat: Option<Duration>,
    event: E,
}

/// Deadline-based timer queue for one simulation.
#[derive(Debug)]
pub struct SimClock<E> {
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E: Copy> SimClock<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            timers: Vec::new(),
        }
    }

    /// Schedules a one-shot timer firing `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> CancelHandle {
        self.push(now + delay, None, event)
    }

    /// Schedules a repeating timer firing every `interval` after `now`.
    ///
    /// Repeating timers keep a fixed cadence: if a poll arrives late, one
    /// event is emitted per elapsed interval so tick counts never drift.
    pub fn schedule_repeating(
        &mut self,
        now: Instant,
        interval: Duration,
        event: E,
    ) -> CancelHandle {
        debug_assert!(!interval.is_zero());
        self.push(now + interval, Some(interval), event)
    }

    fn push(&mut self, due: Instant, repeat: Option<Duration>, event: E) -> CancelHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due,
            repeat,
            event,
        });
        CancelHandle(id)
    }

    /// A canceled handle never fires. Unknown or already-fired handles are
    /// ignored.
    pub fn cancel(&mut self, handle: CancelHandle) {
        self.timers.retain(|t| t.id != handle.0);
    }

    /// Synchronously drops every outstanding timer. Used at teardown so no
    /// stale callback can outlive its simulation.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Fires every timer due at `now`, returning their events ordered by due
    /// time. One-shot timers are consumed; repeating timers are rescheduled.
    pub fn poll(&mut self, now: Instant) -> Vec<E> {
        let mut fired: Vec<(Instant, E)> = Vec::new();
        self.timers.retain_mut(|t| match t.repeat {
            Some(interval) => {
                while t.due <= now {
                    fired.push((t.due, t.event));
                    t.due += interval;
                }
                true
            }
            None => {
                if t.due <= now {
                    fired.push((t.due, t.event));
                    false
                } else {
                    true
                }
            }
        });
        fired.sort_by_key(|&(due, _)| due);
        fired.into_iter().map(|(_, event)| event).collect()
    }
}

impl<E: Copy> Default for SimClock<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn one_shot_fires_exactly_once() {
        let t0 = Instant::now();
        let mut clock = SimClock::new();
        clock.schedule(t0, 10 * MS, "tick");
        assert!(clock.poll(t0 + 9 * MS).is_empty());
        assert_eq!(clock.poll(t0 + 10 * MS), vec!["tick"]);
        assert!(clock.poll(t0 + 100 * MS).is_empty());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn canceled_timer_never_fires() {
        let t0 = Instant::now();
        let mut clock = SimClock::new();
        let handle = clock.schedule(t0, 10 * MS, ());
        clock.cancel(handle);
        assert!(clock.poll(t0 + 20 * MS).is_empty());
    }

    #[test]
    fn cancel_after_fire_is_a_noop() {
        let t0 = Instant::now();
        let mut clock = SimClock::new();
        let handle = clock.schedule(t0, 5 * MS, ());
        assert_eq!(clock.poll(t0 + 5 * MS).len(), 1);
        clock.cancel(handle);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn repeating_timer_catches_up_on_late_polls() {
        let t0 = Instant::now();
        let mut clock = SimClock::new();
        clock.schedule_repeating(t0, 10 * MS, ());
        // First poll after 3.5 intervals: three ticks due.
        assert_eq!(clock.poll(t0 + 35 * MS).len(), 3);
        // Next interval boundary: exactly one more.
        assert_eq!(clock.poll(t0 + 40 * MS).len(), 1);
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn events_fire_in_due_order() {
        let t0 = Instant::now();
        let mut clock = SimClock::new();
        clock.schedule(t0, 30 * MS, "late");
        clock.schedule(t0, 10 * MS, "early");
        assert_eq!(clock.poll(t0 + 30 * MS), vec!["early", "late"]);
    }

    #[test]
    fn cancel_all_clears_everything() {
        let t0 = Instant::now();
        let mut clock = SimClock::new();
        clock.schedule(t0, 10 * MS, ());
        clock.schedule_repeating(t0, 5 * MS, ());
        clock.cancel_all();
        assert_eq!(clock.pending(), 0);
        assert!(clock.poll(t0 + 50 * MS).is_empty());
    }
}
