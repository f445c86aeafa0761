//! Operator-facing read types.

use serde::Serialize;

use tacho_core::DistributionSnapshot;

/// Process-level figures derived from the registry's start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServerStatistics {
    /// Clock reading when the registry was built.
    pub start_time: f64,
    /// Seconds elapsed since `start_time`, computed fresh per read.
    pub uptime: f64,
}

/// Every instrument the registry owns, read in one pass.
///
/// Each instrument is copied under its own short lock; the struct as a
/// whole is not a single atomic cut across instruments.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    pub server: ServerStatistics,
    pub total_time: DistributionSnapshot,
    pub request_time: DistributionSnapshot,
    pub queue_time: DistributionSnapshot,
    pub bytes_sent: DistributionSnapshot,
    pub bytes_received: DistributionSnapshot,
    pub connection_time: DistributionSnapshot,
    pub http_connections: u64,
}
