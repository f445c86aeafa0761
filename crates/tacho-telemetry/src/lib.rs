//! tacho-telemetry — request and connection telemetry engine.
//!
//! Pairs reusable pooled measurement records with the aggregation
//! primitives from `tacho-core`. Handlers acquire a record per request or
//! connection, stamp phase timestamps and byte counts as the work
//! proceeds, then hand the record to a fill function that folds the
//! finished figures into distributions and counters before recycling it.
//!
//! # Architecture
//!
//! ```text
//! TelemetryRegistry
//!   ├── acquire_request() / acquire_connection() → Lease over a pooled record
//!   ├── fill_request() / fill_connection()       → fold figures into instruments
//!   ├── server_statistics()                      → start time + fresh uptime
//!   ├── snapshot()                               → TelemetrySnapshot (serde)
//!   └── gate()                                   → process-wide recording switch
//! ```
//!
//! With the gate off, acquisitions return inert leases and every downstream
//! operation is a cheap no-op; request handling never pays for telemetry it
//! is not producing.

pub mod clock;
pub mod collector;
pub mod config;
pub mod entry;
pub mod error;
pub mod pool;
pub mod registry;
pub mod snapshot;

pub use clock::{Clock, ManualClock, WallClock};
pub use collector::{ConnectionSinks, RequestSinks, fill_connection, fill_request};
pub use config::TelemetryConfig;
pub use entry::{ConnectionEntry, Recyclable, RequestEntry, UNSET};
pub use error::{TelemetryError, TelemetryResult};
pub use pool::{ConnectionLease, EntryPool, Lease, RecordingGate, RequestLease};
pub use registry::TelemetryRegistry;
pub use snapshot::{ServerStatistics, TelemetrySnapshot};
