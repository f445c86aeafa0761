//! Telemetry registry — one object owning the gate, pools, instruments,
//! and clock.
//!
//! Everything the engine needs lives on the registry instead of in
//! process-wide globals, so embedders can run one per server (the normal
//! case) or several side by side in tests.

use std::sync::Arc;

use tracing::info;

use tacho_core::{Counter, Distribution};

use crate::clock::{Clock, WallClock};
use crate::collector::{self, ConnectionSinks, RequestSinks};
use crate::config::TelemetryConfig;
use crate::entry::{ConnectionEntry, RequestEntry};
use crate::error::{TelemetryError, TelemetryResult};
use crate::pool::{ConnectionLease, EntryPool, RecordingGate, RequestLease};
use crate::snapshot::{ServerStatistics, TelemetrySnapshot};

/// The assembled telemetry engine.
///
/// Construction stamps the start time, validates the cut-point tables,
/// builds the six default distributions and the HTTP connection counter,
/// and warms both pools. All methods take `&self`; the registry is shared
/// behind an `Arc` across request-handling threads.
pub struct TelemetryRegistry {
    clock: Arc<dyn Clock>,
    start_time: f64,
    gate: Arc<RecordingGate>,
    request_pool: EntryPool<RequestEntry>,
    connection_pool: EntryPool<ConnectionEntry>,
    total_time: Distribution,
    request_time: Distribution,
    queue_time: Distribution,
    bytes_sent: Distribution,
    bytes_received: Distribution,
    connection_time: Distribution,
    http_connections: Counter,
}

fn build_distribution(figure: &'static str, cuts: &[f64]) -> TelemetryResult<Distribution> {
    Distribution::new(cuts.to_vec()).map_err(|source| TelemetryError::CutPoints { figure, source })
}

impl TelemetryRegistry {
    /// Build a registry against the wall clock.
    pub fn new(config: TelemetryConfig) -> TelemetryResult<Self> {
        Self::with_clock(config, Arc::new(WallClock))
    }

    /// Build a registry against a caller-supplied clock.
    pub fn with_clock(config: TelemetryConfig, clock: Arc<dyn Clock>) -> TelemetryResult<Self> {
        let start_time = clock.now();
        let gate = Arc::new(RecordingGate::new(config.enabled));

        let registry = Self {
            start_time,
            request_pool: EntryPool::new(Arc::clone(&gate)),
            connection_pool: EntryPool::new(Arc::clone(&gate)),
            gate,
            clock,
            total_time: build_distribution("total_time", &config.request_time_cut_points)?,
            request_time: build_distribution("request_time", &config.request_time_cut_points)?,
            queue_time: build_distribution("queue_time", &config.request_time_cut_points)?,
            bytes_sent: build_distribution("bytes_sent", &config.byte_size_cut_points)?,
            bytes_received: build_distribution("bytes_received", &config.byte_size_cut_points)?,
            connection_time: build_distribution(
                "connection_time",
                &config.connection_time_cut_points,
            )?,
            http_connections: Counter::new(),
        };

        registry.request_pool.warm_up(config.warm_request_entries);
        registry.connection_pool.warm_up(config.warm_connection_entries);

        info!(
            enabled = config.enabled,
            warm_request = config.warm_request_entries,
            warm_connection = config.warm_connection_entries,
            "telemetry registry initialized"
        );
        Ok(registry)
    }

    // ── Recording ────────────────────────────────────────────────────────

    /// Take a request record for the lifetime of one request.
    pub fn acquire_request(&self) -> RequestLease {
        self.request_pool.acquire()
    }

    /// Take a connection record for the lifetime of one connection.
    pub fn acquire_connection(&self) -> ConnectionLease {
        self.connection_pool.acquire()
    }

    /// Hand a request record back without recording anything.
    pub fn release_request(&self, lease: RequestLease) {
        lease.release();
    }

    /// Hand a connection record back without recording anything.
    pub fn release_connection(&self, lease: ConnectionLease) {
        lease.release();
    }

    /// Drain a finished request record into the registry's instruments.
    pub fn fill_request(&self, lease: RequestLease) {
        collector::fill_request(lease, self.request_sinks());
    }

    /// Drain a finished connection record into the registry's instruments.
    pub fn fill_connection(&self, lease: ConnectionLease) {
        collector::fill_connection(lease, self.connection_sinks());
    }

    fn request_sinks(&self) -> RequestSinks<'_> {
        RequestSinks {
            total_time: &self.total_time,
            request_time: &self.request_time,
            queue_time: &self.queue_time,
            bytes_sent: &self.bytes_sent,
            bytes_received: &self.bytes_received,
        }
    }

    fn connection_sinks(&self) -> ConnectionSinks<'_> {
        ConnectionSinks {
            http_connections: &self.http_connections,
            connection_time: &self.connection_time,
        }
    }

    // ── Reading ──────────────────────────────────────────────────────────

    pub fn total_time(&self) -> &Distribution {
        &self.total_time
    }

    pub fn request_time(&self) -> &Distribution {
        &self.request_time
    }

    pub fn queue_time(&self) -> &Distribution {
        &self.queue_time
    }

    pub fn bytes_sent(&self) -> &Distribution {
        &self.bytes_sent
    }

    pub fn bytes_received(&self) -> &Distribution {
        &self.bytes_received
    }

    pub fn connection_time(&self) -> &Distribution {
        &self.connection_time
    }

    pub fn http_connections(&self) -> &Counter {
        &self.http_connections
    }

    /// Process start time and uptime, the latter computed fresh per call.
    pub fn server_statistics(&self) -> ServerStatistics {
        ServerStatistics {
            start_time: self.start_time,
            uptime: self.clock.now() - self.start_time,
        }
    }

    /// Read every instrument plus the server figures in one pass.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            server: self.server_statistics(),
            total_time: self.total_time.snapshot(),
            request_time: self.request_time.snapshot(),
            queue_time: self.queue_time.snapshot(),
            bytes_sent: self.bytes_sent.snapshot(),
            bytes_received: self.bytes_received.snapshot(),
            connection_time: self.connection_time.snapshot(),
            http_connections: self.http_connections.value(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// The process-wide recording switch.
    pub fn gate(&self) -> &RecordingGate {
        &self.gate
    }

    /// The pool backing request records.
    pub fn request_pool(&self) -> &EntryPool<RequestEntry> {
        &self.request_pool
    }

    /// The pool backing connection records.
    pub fn connection_pool(&self) -> &EntryPool<ConnectionEntry> {
        &self.connection_pool
    }

    /// Stop recording and free the pooled records.
    ///
    /// Leases still held by callers discard their record on drop;
    /// acquisitions after this point yield inert leases. Snapshots and
    /// server statistics keep working.
    pub fn shutdown(&self) {
        self.gate.disable();
        self.request_pool.shutdown();
        self.connection_pool.shutdown();
        info!("telemetry registry shut down");
    }
}
