//! Monotonic event counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// An atomically incremented 64-bit event count.
///
/// Writers call [`increment`](Counter::increment) or [`add`](Counter::add)
/// from any thread; readers call [`value`](Counter::value). The count is
/// monotonically non-decreasing apart from [`reset`](Counter::reset), which
/// exists for process-start wiring only.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to the count.
    pub fn increment(&self) {
        self.add(1);
    }

    /// Add `delta` to the count.
    pub fn add(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    /// Current count.
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Reset the count to zero.
    ///
    /// Intended for process start only; concurrent increments around a
    /// reset land either before or after it, never partially.
    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn starts_at_zero() {
        let counter = Counter::new();
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn increment_and_add() {
        let counter = Counter::new();
        counter.increment();
        counter.increment();
        counter.add(40);
        assert_eq!(counter.value(), 42);
    }

    #[test]
    fn add_zero_is_a_no_op() {
        let counter = Counter::new();
        counter.add(0);
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn reset_returns_to_zero() {
        let counter = Counter::new();
        counter.add(7);
        counter.reset();
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn concurrent_increments_all_land() {
        let counter = Arc::new(Counter::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                for _ in 0..1_000 {
                    counter.increment();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.value(), 8_000);
    }
}
