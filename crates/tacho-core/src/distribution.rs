//! Cut-point histogram with running moments.

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{CoreResult, DistributionError};

/// A histogram accumulator over a fixed, ascending cut-point table.
///
/// A value lands in the first bucket whose cut point it does not exceed
/// (`value <= cut`); one extra bucket catches everything above the last cut
/// point. Alongside the buckets the distribution keeps a running count, sum,
/// and sum of squares, so readers can derive mean and variance without ever
/// walking individual samples.
///
/// Recording takes the distribution's own short-held lock; the bucket lookup
/// happens before the lock so the critical section is a handful of field
/// increments. Values are trusted to be well-formed non-negative durations
/// or sizes; filtering sentinels and malformed intervals is the caller's
/// job.
#[derive(Debug)]
pub struct Distribution {
    /// Ascending bucket boundaries, fixed at construction.
    cut_points: Vec<f64>,
    state: Mutex<State>,
}

#[derive(Debug, Clone)]
struct State {
    /// Per-bucket occurrence counts; `cut_points.len() + 1` entries.
    buckets: Vec<u64>,
    count: u64,
    sum: f64,
    sum_squares: f64,
}

/// Point-in-time copy of a distribution's aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSnapshot {
    /// The boundary table the buckets were counted against.
    pub cut_points: Vec<f64>,
    /// Per-bucket counts; one more entry than `cut_points`.
    pub buckets: Vec<u64>,
    /// Total number of recorded values.
    pub count: u64,
    /// Sum of all recorded values.
    pub sum: f64,
    /// Sum of the squares of all recorded values.
    pub sum_squares: f64,
}

impl DistributionSnapshot {
    /// Arithmetic mean of the recorded values, or 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

impl Distribution {
    /// Build a distribution from an ascending cut-point table.
    ///
    /// The table must be non-empty, finite, and strictly ascending.
    pub fn new(cut_points: Vec<f64>) -> CoreResult<Self> {
        if cut_points.is_empty() {
            return Err(DistributionError::Empty);
        }
        for (index, cut) in cut_points.iter().enumerate() {
            if !cut.is_finite() {
                return Err(DistributionError::NotFinite { index });
            }
        }
        for (index, pair) in cut_points.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(DistributionError::NotAscending {
                    index: index + 1,
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }

        let buckets = vec![0u64; cut_points.len() + 1];
        Ok(Self {
            cut_points,
            state: Mutex::new(State {
                buckets,
                count: 0,
                sum: 0.0,
                sum_squares: 0.0,
            }),
        })
    }

    /// Record one observed value.
    ///
    /// Safe for concurrent callers; the bucket counts and the running
    /// moments are updated under one lock, so they never diverge.
    pub fn record(&self, value: f64) {
        debug_assert!(!value.is_nan(), "recorded value must not be NaN");

        let index = self.bucket_index(value);

        let mut state = self.state.lock();
        state.buckets[index] += 1;
        state.count += 1;
        state.sum += value;
        state.sum_squares += value * value;
    }

    /// First bucket whose cut point the value does not exceed.
    ///
    /// `partition_point` counts the cut points strictly below `value`, which
    /// is exactly the index of the first cut with `value <= cut`; when the
    /// value exceeds every cut point this is the overflow bucket.
    fn bucket_index(&self, value: f64) -> usize {
        self.cut_points.partition_point(|cut| *cut < value)
    }

    /// The boundary table this distribution was built with.
    pub fn cut_points(&self) -> &[f64] {
        &self.cut_points
    }

    /// Consistent point-in-time copy of all aggregates.
    ///
    /// Taken under the same lock `record` uses, so the bucket counts always
    /// sum to `count`.
    pub fn snapshot(&self) -> DistributionSnapshot {
        let state = self.state.lock();
        DistributionSnapshot {
            cut_points: self.cut_points.clone(),
            buckets: state.buckets.clone(),
            count: state.count,
            sum: state.sum,
            sum_squares: state.sum_squares,
        }
    }
}
