//! tacho-core — measurement primitives for server telemetry.
//!
//! Two lock-cheap accumulators cover everything the telemetry layer
//! aggregates: [`Counter`] for monotonically growing event tallies and
//! [`Distribution`] for cut-point histograms with running sum and sum of
//! squares. Both are safe to share across request-handling threads and are
//! read through consistent point-in-time snapshots.
//!
//! # Architecture
//!
//! ```text
//! Counter
//!   ├── increment() / add()   ← hot path, one relaxed atomic op
//!   └── value()               → current tally
//!
//! Distribution
//!   ├── record()              ← hot path, bucket lookup + locked increments
//!   └── snapshot()            → DistributionSnapshot (buckets, count, sum, …)
//! ```

pub mod counter;
pub mod distribution;
pub mod error;

pub use counter::Counter;
pub use distribution::{Distribution, DistributionSnapshot};
pub use error::{CoreResult, DistributionError};
