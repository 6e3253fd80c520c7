//! Running total of travel time across a trip's legs.

use std::sync::{Mutex, PoisonError};

/// Shared running total, adjusted only by signed deltas.
///
/// Each leg reports exactly one delta per change of its own contribution:
/// its full duration when first resolved, the signed difference on a mode
/// change, and its negated contribution when removed. The accumulator
/// never needs to know about individual legs.
pub trait DurationAccumulator: Send + Sync {
    /// Adjust the total by `delta_minutes` (may be negative).
    fn apply_delta(&self, delta_minutes: f64);

    /// Current total in minutes.
    fn total(&self) -> f64;
}

/// Trip-wide travel time total.
///
/// Updates are serialised behind a mutex so concurrent legs never lose
/// an update.
#[derive(Debug, Default)]
pub struct TripDurationTotal {
    minutes: Mutex<f64>,
}

impl TripDurationTotal {
    /// Create a total of zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurationAccumulator for TripDurationTotal {
    fn apply_delta(&self, delta_minutes: f64) {
        let mut minutes = self.minutes.lock().unwrap_or_else(PoisonError::into_inner);
        *minutes += delta_minutes;
    }

    fn total(&self) -> f64 {
        *self.minutes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
