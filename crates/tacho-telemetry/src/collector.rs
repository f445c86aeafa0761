//! Fill functions — drain completed records into instruments.
//!
//! A fill consumes the lease: every figure worth keeping is extracted into
//! the caller's sinks, then the lease drops and the record goes back to its
//! pool. Exactly one terminal release per record, no matter which figures
//! were recorded.

use tacho_core::{Counter, Distribution};

use crate::pool::{ConnectionLease, RequestLease};

/// Where a drained request record's figures land.
#[derive(Clone, Copy)]
pub struct RequestSinks<'a> {
    pub total_time: &'a Distribution,
    pub request_time: &'a Distribution,
    pub queue_time: &'a Distribution,
    pub bytes_sent: &'a Distribution,
    pub bytes_received: &'a Distribution,
}

/// Where a drained connection record's figures land.
#[derive(Clone, Copy)]
pub struct ConnectionSinks<'a> {
    pub http_connections: &'a Counter,
    pub connection_time: &'a Distribution,
}

/// Drain a finished request record into the sinks and recycle it.
///
/// Each time span is recorded only when both endpoints were stamped and the
/// interval is not backwards; a malformed span skips that one distribution
/// and the rest of the fill proceeds. Byte counts are recorded
/// unconditionally. The outcome flags on the entry are data for the caller
/// to act on before filling, not a filter applied here; a caller that wants
/// a flagged request excluded releases the lease without filling.
///
/// An inert lease makes the whole call a no-op.
pub fn fill_request(lease: RequestLease, sinks: RequestSinks<'_>) {
    let Some(entry) = lease.entry() else {
        return;
    };

    if let Some(span) = entry.total_time() {
        sinks.total_time.record(span);
    }
    if let Some(span) = entry.request_time() {
        sinks.request_time.record(span);
    }
    if let Some(span) = entry.queue_time() {
        sinks.queue_time.record(span);
    }
    sinks.bytes_sent.record(entry.sent_bytes);
    sinks.bytes_received.record(entry.received_bytes);
}

/// Drain a finished connection record into the sinks and recycle it.
///
/// HTTP connections bump the counter; the lifetime lands in the
/// distribution when both endpoints were stamped.
pub fn fill_connection(lease: ConnectionLease, sinks: ConnectionSinks<'_>) {
    let Some(entry) = lease.entry() else {
        return;
    };

    if entry.is_http {
        sinks.http_connections.increment();
    }
    if let Some(span) = entry.connection_time() {
        sinks.connection_time.record(span);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entry::{ConnectionEntry, RequestEntry};
    use crate::pool::{EntryPool, RecordingGate};

    struct RequestFixture {
        pool: EntryPool<RequestEntry>,
        total_time: Distribution,
        request_time: Distribution,
        queue_time: Distribution,
        bytes_sent: Distribution,
        bytes_received: Distribution,
    }

    impl RequestFixture {
        fn new() -> Self {
            let gate = Arc::new(RecordingGate::new(true));
            let cuts = || Distribution::new(vec![1.0, 10.0]).unwrap();
            Self {
                pool: EntryPool::new(gate),
                total_time: cuts(),
                request_time: cuts(),
                queue_time: cuts(),
                bytes_sent: cuts(),
                bytes_received: cuts(),
            }
        }

        fn sinks(&self) -> RequestSinks<'_> {
            RequestSinks {
                total_time: &self.total_time,
                request_time: &self.request_time,
                queue_time: &self.queue_time,
                bytes_sent: &self.bytes_sent,
                bytes_received: &self.bytes_received,
            }
        }
    }

    #[test]
    fn full_request_records_every_figure() {
        let fixture = RequestFixture::new();
        let mut lease = fixture.pool.acquire();
        {
            let entry = lease.entry_mut().unwrap();
            entry.read_start = 10.0;
            entry.queue_start = 10.1;
            entry.queue_end = 10.2;
            entry.request_start = 10.2;
            entry.request_end = 10.7;
            entry.write_start = 10.7;
            entry.write_end = 11.0;
            entry.received_bytes = 300.0;
            entry.sent_bytes = 1_500.0;
        }
        fill_request(lease, fixture.sinks());

        assert_eq!(fixture.total_time.snapshot().count, 1);
        assert_eq!(fixture.total_time.snapshot().sum, 1.0);
        assert_eq!(fixture.request_time.snapshot().sum, 0.5);
        assert_eq!(fixture.queue_time.snapshot().count, 1);
        assert_eq!(fixture.bytes_sent.snapshot().sum, 1_500.0);
        assert_eq!(fixture.bytes_received.snapshot().sum, 300.0);

        // The record went back to the pool after the fill.
        assert_eq!(fixture.pool.free_len(), 1);
    }

    #[test]
    fn backwards_interval_skips_only_that_figure() {
        let fixture = RequestFixture::new();
        let mut lease = fixture.pool.acquire();
        {
            let entry = lease.entry_mut().unwrap();
            entry.request_start = 5.0;
            entry.request_end = 3.0;
            entry.received_bytes = 100.0;
            entry.sent_bytes = 200.0;
        }
        fill_request(lease, fixture.sinks());

        assert_eq!(fixture.request_time.snapshot().count, 0);
        assert_eq!(fixture.total_time.snapshot().count, 0);
        assert_eq!(fixture.bytes_sent.snapshot().count, 1);
        assert_eq!(fixture.bytes_received.snapshot().count, 1);
        assert_eq!(fixture.pool.free_len(), 1);
    }

    #[test]
    fn inert_lease_fills_nothing() {
        let fixture = RequestFixture::new();
        let gate = Arc::new(RecordingGate::default());
        let idle_pool: EntryPool<RequestEntry> = EntryPool::new(gate);

        fill_request(idle_pool.acquire(), fixture.sinks());

        assert_eq!(fixture.total_time.snapshot().count, 0);
        assert_eq!(fixture.bytes_sent.snapshot().count, 0);
        assert_eq!(idle_pool.free_len(), 0);
    }

    #[test]
    fn http_connection_bumps_counter_and_time() {
        let gate = Arc::new(RecordingGate::new(true));
        let pool: EntryPool<ConnectionEntry> = EntryPool::new(gate);
        let counter = Counter::new();
        let connection_time = Distribution::new(vec![0.1, 1.0, 60.0]).unwrap();

        let mut lease = pool.acquire();
        {
            let entry = lease.entry_mut().unwrap();
            entry.is_http = true;
            entry.conn_start = 100.0;
            entry.conn_end = 100.25;
        }
        fill_connection(
            lease,
            ConnectionSinks {
                http_connections: &counter,
                connection_time: &connection_time,
            },
        );

        assert_eq!(counter.value(), 1);
        let snap = connection_time.snapshot();
        assert_eq!(snap.count, 1);
        assert_eq!(snap.sum, 0.25);
        assert_eq!(pool.free_len(), 1);
    }

    #[test]
    fn non_http_connection_keeps_counter_still() {
        let gate = Arc::new(RecordingGate::new(true));
        let pool: EntryPool<ConnectionEntry> = EntryPool::new(gate);
        let counter = Counter::new();
        let connection_time = Distribution::new(vec![1.0]).unwrap();

        let mut lease = pool.acquire();
        {
            let entry = lease.entry_mut().unwrap();
            entry.conn_start = 1.0;
            entry.conn_end = 3.0;
        }
        fill_connection(
            lease,
            ConnectionSinks {
                http_connections: &counter,
                connection_time: &connection_time,
            },
        );

        assert_eq!(counter.value(), 0);
        assert_eq!(connection_time.snapshot().count, 1);
    }

    #[test]
    fn still_open_connection_records_no_time() {
        let gate = Arc::new(RecordingGate::new(true));
        let pool: EntryPool<ConnectionEntry> = EntryPool::new(gate);
        let counter = Counter::new();
        let connection_time = Distribution::new(vec![1.0]).unwrap();

        let mut lease = pool.acquire();
        {
            let entry = lease.entry_mut().unwrap();
            entry.is_http = true;
            entry.conn_start = 50.0;
        }
        fill_connection(
            lease,
            ConnectionSinks {
                http_connections: &counter,
                connection_time: &connection_time,
            },
        );

        assert_eq!(counter.value(), 1);
        assert_eq!(connection_time.snapshot().count, 0);
    }
}
