//! Telemetry configuration — enable switch, warm-up counts, cut-point
//! tables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TelemetryResult;

/// Configuration a registry is built from.
///
/// Every field has a default, so an empty TOML document (or no file at
/// all) yields a fully working setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Whether recording starts enabled.
    pub enabled: bool,
    /// Request records preallocated at startup.
    pub warm_request_entries: usize,
    /// Connection records preallocated at startup.
    pub warm_connection_entries: usize,
    /// Bucket boundaries (seconds) for total, request, and queue time.
    pub request_time_cut_points: Vec<f64>,
    /// Bucket boundaries (seconds) for connection lifetime.
    pub connection_time_cut_points: Vec<f64>,
    /// Bucket boundaries (bytes) shared by sent and received sizes.
    pub byte_size_cut_points: Vec<f64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warm_request_entries: 64,
            warm_connection_entries: 64,
            request_time_cut_points: vec![0.01, 0.05, 0.1, 0.2, 0.5, 1.0],
            connection_time_cut_points: vec![0.1, 1.0, 60.0],
            byte_size_cut_points: vec![250.0, 1_000.0, 2_000.0, 5_000.0, 10_000.0],
        }
    }
}

impl TelemetryConfig {
    /// Parse a configuration from TOML text. Missing fields keep their
    /// defaults.
    pub fn from_toml_str(text: &str) -> TelemetryResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> TelemetryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
