//! Monotonic wall clock for stores that stamp rows themselves.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// A clock whose readings strictly increase, even if the wall clock stalls
/// or steps backward between two calls.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    // Largest timestamp handed out so far, in microseconds (Postgres precision).
    high_water_us: AtomicI64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let mut prev = self.high_water_us.load(Ordering::Acquire);
        loop {
            let ts = wall.max(prev + 1);
            match self.high_water_us.compare_exchange_weak(
                prev,
                ts,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return DateTime::from_timestamp_micros(ts).unwrap_or_default(),
                Err(actual) => prev = actual,
            }
        }
    }
}
