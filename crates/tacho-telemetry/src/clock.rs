//! Time sources for stamping and uptime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of seconds-as-float readings.
///
/// Readings are trusted as given and only ever compared against other
/// readings from the same clock; the engine applies no skew correction.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Seconds since the Unix epoch with sub-second precision. The default
/// wiring for production registries.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// A clock that only moves when told to. Stores the reading as raw `f64`
/// bits in an atomic so tests can share it across threads.
#[derive(Debug)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self {
            bits: AtomicU64::new(now.to_bits()),
        }
    }

    /// Jump to an absolute reading.
    pub fn set(&self, now: f64) {
        self.bits.store(now.to_bits(), Ordering::Relaxed);
    }

    /// Move the reading forward by `delta` seconds.
    pub fn advance(&self, delta: f64) {
        self.set(self.now() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_moves_forward() {
        let clock = WallClock;
        let first = clock.now();
        let second = clock.now();
        assert!(first > 0.0);
        assert!(second >= first);
    }

    #[test]
    fn manual_clock_holds_and_advances() {
        let clock = ManualClock::new(1_000.0);
        assert_eq!(clock.now(), 1_000.0);
        assert_eq!(clock.now(), 1_000.0);

        clock.advance(0.25);
        assert_eq!(clock.now(), 1_000.25);

        clock.set(5.0);
        assert_eq!(clock.now(), 5.0);
    }
}
