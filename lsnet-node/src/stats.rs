use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for a router's pipeline, shared between the router task
/// and observers via `Arc`.
///
/// Drops are split by cause: a full egress queue is expected under
/// load, a table lookup miss points at a topology or configuration
/// inconsistency.
#[derive(Debug, Default)]
pub struct RouterStats {
    /// Frames enqueued on an egress interface.
    forwarded: AtomicUsize,
    /// Frames dropped because the egress queue was at capacity.
    dropped_full: AtomicUsize,
    /// Frames dropped because a table had no entry for them.
    dropped_lookup: AtomicUsize,
}

impl RouterStats {
    #[inline]
    pub(crate) fn increment_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_dropped_full(&self) {
        self.dropped_full.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_dropped_lookup(&self) {
        self.dropped_lookup.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn forwarded(&self) -> usize {
        self.forwarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_full(&self) -> usize {
        self.dropped_full.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_lookup(&self) -> usize {
        self.dropped_lookup.load(Ordering::Relaxed)
    }
}
