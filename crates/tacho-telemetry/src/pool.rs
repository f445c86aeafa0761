//! Free-list pools — recycle measurement records instead of allocating
//! per request.
//!
//! Each entry type gets its own pool and its own mutex, so request and
//! connection bookkeeping never contend. The pool hands out [`Lease`]s:
//! move-only handles that recycle their record back onto the free list when
//! dropped, on every control-flow path. A disabled [`RecordingGate`] turns
//! acquisition into a lock-free no-op that yields an inert lease.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::entry::{ConnectionEntry, Recyclable, RequestEntry};

/// Process-wide switch deciding whether acquisitions yield live records.
///
/// Reads and writes are single relaxed atomic operations; a reader racing a
/// toggle may briefly see the old value, which costs at most one recorded
/// or skipped measurement.
#[derive(Debug)]
pub struct RecordingGate {
    enabled: AtomicBool,
}

impl RecordingGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }
}

impl Default for RecordingGate {
    /// Disabled until something turns it on.
    fn default() -> Self {
        Self::new(false)
    }
}

struct FreeList<T> {
    records: VecDeque<Box<T>>,
    closed: bool,
}

struct PoolShared<T> {
    gate: Arc<RecordingGate>,
    free: Mutex<FreeList<T>>,
    /// Records ever created, warm or on demand.
    allocated: AtomicUsize,
}

/// A free-list pool of reusable records.
///
/// Acquisition never refuses: when the free list is empty a fresh record is
/// boxed on the spot, trading memory for an always-available hot path. The
/// lock only covers the list splice itself; allocation and recycling happen
/// outside it, and the free list keeps capacity for every record the pool
/// has created, so the recycle splice never grows the deque. Capacity work
/// rides the warm-up and growth paths instead.
pub struct EntryPool<T: Recyclable> {
    shared: Arc<PoolShared<T>>,
}

impl<T: Recyclable> EntryPool<T> {
    /// Create an empty pool sharing the given gate.
    pub fn new(gate: Arc<RecordingGate>) -> Self {
        Self {
            shared: Arc::new(PoolShared {
                gate,
                free: Mutex::new(FreeList {
                    records: VecDeque::new(),
                    closed: false,
                }),
                allocated: AtomicUsize::new(0),
            }),
        }
    }

    /// Take a record for exclusive use until the lease drops.
    ///
    /// With the gate off (or the pool shut down) this returns an inert
    /// lease: no lock is taken on the gate-off path, no record is touched,
    /// and every downstream operation on the lease is a no-op.
    pub fn acquire(&self) -> Lease<T> {
        if !self.shared.gate.is_enabled() {
            return Lease {
                entry: None,
                shared: Arc::clone(&self.shared),
            };
        }

        let recycled = {
            let mut free = self.shared.free.lock();
            if free.closed {
                return Lease {
                    entry: None,
                    shared: Arc::clone(&self.shared),
                };
            }
            free.records.pop_front()
        };

        let entry = match recycled {
            Some(entry) => entry,
            None => self.grow(),
        };

        Lease {
            entry: Some(entry),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Box a fresh record and widen the free list so its eventual return
    /// splices into spare capacity.
    fn grow(&self) -> Box<T> {
        let total = self.shared.allocated.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(total, "free list empty, allocating a fresh record");
        let entry = Box::new(T::default());

        let mut free = self.shared.free.lock();
        if free.records.capacity() < total {
            let len = free.records.len();
            free.records.reserve(total - len);
        }
        entry
    }

    /// Preallocate `count` records onto the free list.
    pub fn warm_up(&self, count: usize) {
        let mut fresh: Vec<Box<T>> = Vec::with_capacity(count);
        for _ in 0..count {
            fresh.push(Box::new(T::default()));
        }

        let mut free = self.shared.free.lock();
        if free.closed {
            return;
        }
        let outstanding = self
            .shared
            .allocated
            .load(Ordering::Relaxed)
            .saturating_sub(free.records.len());
        // Room for every record the pool has created plus a spare warm
        // set, so returning leases splice without growing the deque.
        free.records.reserve(outstanding + 2 * count);
        free.records.extend(fresh);
        drop(free);

        self.shared.allocated.fetch_add(count, Ordering::Relaxed);
        debug!(count, "entry pool warmed");
    }

    /// Close the pool and free everything on the free list.
    ///
    /// Leases still out keep working against their record but discard it on
    /// drop instead of recycling; later acquisitions yield inert leases.
    pub fn shutdown(&self) {
        let drained = {
            let mut free = self.shared.free.lock();
            free.closed = true;
            std::mem::take(&mut free.records)
        };
        debug!(freed = drained.len(), "entry pool shut down");
    }

    /// Records currently sitting on the free list.
    pub fn free_len(&self) -> usize {
        self.shared.free.lock().records.len()
    }

    /// Slot capacity of the free list's backing storage.
    pub fn free_capacity(&self) -> usize {
        self.shared.free.lock().records.capacity()
    }

    /// Total records ever created for this pool.
    pub fn allocated(&self) -> usize {
        self.shared.allocated.load(Ordering::Relaxed)
    }
}

/// Exclusive, move-only handle over one pooled record.
///
/// Holding the lease is holding the record: stamp fields through
/// [`entry_mut`](Lease::entry_mut), then drop (or [`release`](Lease::release))
/// to recycle it. Because the lease moves and never clones, releasing twice
/// or touching a released record does not compile.
pub struct Lease<T: Recyclable> {
    /// `None` for an inert lease (gate off or pool closed).
    entry: Option<Box<T>>,
    shared: Arc<PoolShared<T>>,
}

/// Lease over a request measurement record.
pub type RequestLease = Lease<RequestEntry>;
/// Lease over a connection measurement record.
pub type ConnectionLease = Lease<ConnectionEntry>;

impl<T: Recyclable> Lease<T> {
    /// Whether this lease holds a live record.
    pub fn is_active(&self) -> bool {
        self.entry.is_some()
    }

    /// The record, or `None` for an inert lease.
    pub fn entry(&self) -> Option<&T> {
        self.entry.as_deref()
    }

    pub fn entry_mut(&mut self) -> Option<&mut T> {
        self.entry.as_deref_mut()
    }

    /// Hand the record back now. Purely a readable name for dropping the
    /// lease; the recycling itself lives in `Drop`.
    pub fn release(self) {}
}

impl<T: Recyclable> Drop for Lease<T> {
    fn drop(&mut self) {
        let Some(mut entry) = self.entry.take() else {
            return;
        };
        // Wipe outside the lock; the push below splices into capacity
        // reserved at warm-up or growth time.
        entry.recycle();

        let mut free = self.shared.free.lock();
        if !free.closed {
            free.records.push_back(entry);
        }
    }
}
