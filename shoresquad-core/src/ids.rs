//! Timestamp-based identifiers that stay unique under rapid creation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

/// Hands out millisecond timestamps, bumped past the last value issued.
///
/// Two records created within the same millisecond get consecutive values
/// instead of colliding.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    /// Generator whose next value is greater than `floor`.
    #[must_use]
    pub fn seeded(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    /// Make sure future values exceed `floor`, e.g. after loading persisted records.
    pub fn observe(&self, floor: u64) {
        self.last.fetch_max(floor, Ordering::SeqCst);
    }

    /// Next identifier for a record created at `now`.
    pub fn next(&self, now: DateTime<Utc>) -> u64 {
        let stamp = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = stamp.max(current.saturating_add(1));
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}
