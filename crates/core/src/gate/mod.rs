//! Bounded-concurrency admission gate for native conversions.
//!
//! The gate is a counting limiter around calls into the imaging engine:
//! `try_acquire` is non-blocking and rejects immediately when saturated, so
//! backpressure surfaces to the caller instead of queueing inside the
//! process. The counter is the only shared mutable state in the core; its
//! mutex guards increment/decrement only and is never held across the
//! conversion itself.

use std::sync::Mutex;

/// Counting admission gate with an RAII release guard.
#[derive(Debug)]
pub struct AdmissionGate {
    max_concurrent: i64,
    in_flight: Mutex<i64>,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `max_concurrent` concurrent holders.
    ///
    /// A non-positive limit means every acquisition is rejected.
    pub fn new(max_concurrent: i64) -> Self {
        Self {
            max_concurrent,
            in_flight: Mutex::new(0),
        }
    }

    /// Attempts to take a slot without blocking.
    ///
    /// Returns a permit that releases the slot on drop, or `None` when the
    /// gate is saturated. No fairness is guaranteed among rejected callers.
    pub fn try_acquire(&self) -> Option<GatePermit<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if self.max_concurrent <= 0 || *in_flight >= self.max_concurrent {
            return None;
        }

        *in_flight += 1;
        Some(GatePermit { gate: self })
    }

    /// Number of slots currently held.
    pub fn in_flight(&self) -> i64 {
        *self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn max_concurrent(&self) -> i64 {
        self.max_concurrent
    }

    /// Releases one slot, clamping at zero. Unmatched releases are a
    /// programming error but must never drive the counter negative.
    fn release(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if *in_flight > 0 {
            *in_flight -= 1;
        }
    }
}

/// Holds one admission slot; the slot is released exactly once on drop,
/// whatever exit path the guarded conversion takes.
#[derive(Debug)]
pub struct GatePermit<'a> {
    gate: &'a AdmissionGate,
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
