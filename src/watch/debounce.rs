// src/watch/debounce.rs

use std::time::{Duration, Instant};

/// Baseline spacing below which write events are always collapsed.
///
/// Editors routinely emit several write notifications for one save, all
/// within about a second; anything closer than this is never a second edit.
const BASELINE: Duration = Duration::from_secs(1);

/// Collapses bursts of change events into a single rebuild trigger.
///
/// A trigger is accepted only if at least `1s + tolerance` has elapsed since
/// the last accepted trigger. On acceptance, the reference time moves forward
/// *before* the (possibly slow) rebuild runs, so notifications arriving
/// during a rebuild are debounced against it.
///
/// `tolerance` is calibrated once, to the duration of the first restart
/// cycle: a human edit cycle is unlikely to be faster than one full build,
/// and the calibrated floor keeps a rebuild from being re-triggered by the
/// artifact churn of the previous one. Later builds do not recalibrate, even
/// if they turn out slower.
///
/// Owned exclusively by the engine's event-loop worker; no synchronization.
#[derive(Debug)]
pub struct DebounceGate {
    last_accepted: Instant,
    tolerance: Duration,
}

impl DebounceGate {
    /// A gate whose reference time is `reference` and whose tolerance is
    /// still zero (uncalibrated).
    pub fn new(reference: Instant) -> Self {
        Self {
            last_accepted: reference,
            tolerance: Duration::ZERO,
        }
    }

    /// Set the tolerance from the measured first-cycle duration.
    pub fn calibrate(&mut self, first_cycle: Duration) {
        self.tolerance = first_cycle;
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Minimum spacing between accepted triggers.
    pub fn window(&self) -> Duration {
        BASELINE + self.tolerance
    }

    /// Time elapsed since the last accepted trigger, as of `now`.
    pub fn elapsed_since_accepted(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_accepted)
    }

    /// Decide whether a change notification at `now` should trigger a
    /// rebuild. Accepting moves the reference time to `now`.
    pub fn should_trigger(&mut self, now: Instant) -> bool {
        if self.elapsed_since_accepted(now) < self.window() {
            return false;
        }
        self.last_accepted = now;
        true
    }
}
