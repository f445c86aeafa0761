//! Error types for the telemetry engine.

use thiserror::Error;

use tacho_core::DistributionError;

/// Result type alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors that can occur while building or configuring the telemetry engine.
///
/// Recording itself never fails; only registry construction and config
/// loading return these.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid cut-point table for {figure}: {source}")]
    CutPoints {
        figure: &'static str,
        source: DistributionError,
    },

    #[error("failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
