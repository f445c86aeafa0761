//! Error types for the tacho measurement primitives.

use thiserror::Error;

/// Result type alias for primitive construction.
pub type CoreResult<T> = Result<T, DistributionError>;

/// Errors raised when building a [`Distribution`](crate::Distribution)
/// from a cut-point table.
#[derive(Debug, Error, PartialEq)]
pub enum DistributionError {
    #[error("cut-point table is empty")]
    Empty,

    #[error("cut point at index {index} is not finite")]
    NotFinite { index: usize },

    #[error("cut points must be strictly ascending: {prev} then {next} at index {index}")]
    NotAscending { index: usize, prev: f64, next: f64 },
}
