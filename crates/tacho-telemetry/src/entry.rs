//! Measurement records — the reusable units the pools hand out.
//!
//! A record is stamped in place by whoever holds its lease: phase
//! timestamps as the work moves through read, queue, execute, and write,
//! byte counts and outcome flags as they become known. Timestamps start at
//! [`UNSET`]; a phase that never happened keeps the sentinel and its
//! interval helper reports `None`, which is how malformed or absent spans
//! stay out of the distributions.

/// Sentinel for a timestamp that was never stamped. Any reading `>= 0` is
/// considered set.
pub const UNSET: f64 = -1.0;

/// Returns the span between two stamped timestamps.
///
/// `None` when the start was never set or the end precedes it; a
/// zero-length span is a valid reading and is reported.
fn span(start: f64, end: f64) -> Option<f64> {
    if start >= 0.0 && end >= start {
        Some(end - start)
    } else {
        None
    }
}

/// One request's worth of measurements.
///
/// Fields are stamped directly by the lease holder; there is exactly one
/// writer between acquire and release, so no field needs interior
/// mutability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestEntry {
    /// First byte of the request seen / request fully read.
    pub read_start: f64,
    pub read_end: f64,
    /// Waiting for an execution slot.
    pub queue_start: f64,
    pub queue_end: f64,
    /// Handler execution.
    pub request_start: f64,
    pub request_end: f64,
    /// Response write-out.
    pub write_start: f64,
    pub write_end: f64,
    /// Request body size in bytes.
    pub received_bytes: f64,
    /// Response body size in bytes.
    pub sent_bytes: f64,
    /// The request exceeded the configured size limit.
    pub too_large: bool,
    /// The handler reported a failure.
    pub execute_error: bool,
}

impl Default for RequestEntry {
    fn default() -> Self {
        Self {
            read_start: UNSET,
            read_end: UNSET,
            queue_start: UNSET,
            queue_end: UNSET,
            request_start: UNSET,
            request_end: UNSET,
            write_start: UNSET,
            write_end: UNSET,
            received_bytes: 0.0,
            sent_bytes: 0.0,
            too_large: false,
            execute_error: false,
        }
    }
}

impl RequestEntry {
    /// First byte read to last byte written.
    pub fn total_time(&self) -> Option<f64> {
        span(self.read_start, self.write_end)
    }

    /// Handler execution span.
    pub fn request_time(&self) -> Option<f64> {
        span(self.request_start, self.request_end)
    }

    /// Time spent waiting for an execution slot.
    pub fn queue_time(&self) -> Option<f64> {
        span(self.queue_start, self.queue_end)
    }
}

/// One connection's worth of measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionEntry {
    /// Whether this connection spoke HTTP.
    pub is_http: bool,
    /// Connection opened / closed.
    pub conn_start: f64,
    pub conn_end: f64,
    /// The connection ended in error.
    pub error: bool,
}

impl Default for ConnectionEntry {
    fn default() -> Self {
        Self {
            is_http: false,
            conn_start: UNSET,
            conn_end: UNSET,
            error: false,
        }
    }
}

impl ConnectionEntry {
    /// Connection lifetime, open to close.
    pub fn connection_time(&self) -> Option<f64> {
        span(self.conn_start, self.conn_end)
    }
}

/// A record the pool can hand out and take back.
///
/// The provided `recycle` wipes the record back to its initial state; the
/// pool calls it on every release so a reused record never leaks readings
/// from its previous holder.
pub trait Recyclable: Default + Send + 'static {
    fn recycle(&mut self) {
        *self = Self::default();
    }
}

impl Recyclable for RequestEntry {}
impl Recyclable for ConnectionEntry {}
