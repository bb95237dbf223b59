//! ## minne::stats
//! **Allocation traffic counters**
//!
//! [`AllocStats`] tracks strategy traffic with relaxed atomics, and
//! [`CountingAllocator`] instruments any strategy by delegating every
//! operation while counting it. Snapshots serialize with `serde` for
//! telemetry export.

use core::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::strategy::Allocator;

/// Thread-safe allocation counters.
///
/// Counters are individually monotonic; a reader racing a writer may see
/// momentarily lagging values.
#[derive(Debug, Default)]
pub struct AllocStats {
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    reallocations: AtomicUsize,
    zeroed_allocations: AtomicUsize,
    failed_allocations: AtomicUsize,
}

impl AllocStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_allocation(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_deallocation(&self) {
        self.deallocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_reallocation(&self) {
        self.reallocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_zeroed_allocation(&self) {
        self.zeroed_allocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failed_allocation(&self) {
        self.failed_allocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::Relaxed)
    }

    pub fn reallocations(&self) -> usize {
        self.reallocations.load(Ordering::Relaxed)
    }

    pub fn zeroed_allocations(&self) -> usize {
        self.zeroed_allocations.load(Ordering::Relaxed)
    }

    pub fn failed_allocations(&self) -> usize {
        self.failed_allocations.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            allocations: self.allocations(),
            deallocations: self.deallocations(),
            reallocations: self.reallocations(),
            zeroed_allocations: self.zeroed_allocations(),
            failed_allocations: self.failed_allocations(),
        }
    }
}

/// Serializable view of [`AllocStats`] at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub allocations: usize,
    pub deallocations: usize,
    pub reallocations: usize,
    pub zeroed_allocations: usize,
    pub failed_allocations: usize,
}

/// Strategy wrapper that counts traffic while delegating to `inner`.
///
/// `allocate_zeroed` forwards to the inner strategy's own zeroed path,
/// so wrapping the platform strategy keeps the platform calloc route
/// instead of demoting it to the synthesized byte-fill.
pub struct CountingAllocator<A> {
    inner: A,
    stats: Arc<AllocStats>,
}

impl<A> CountingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self::with_stats(inner, Arc::new(AllocStats::new()))
    }

    /// Wraps `inner` recording into an externally owned counter set.
    pub fn with_stats(inner: A, stats: Arc<AllocStats>) -> Self {
        Self { inner, stats }
    }

    pub fn stats(&self) -> &Arc<AllocStats> {
        &self.stats
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

unsafe impl<A: Allocator + 'static> Allocator for CountingAllocator<A> {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let block = self.inner.allocate(size);
        match block {
            Some(_) => self.stats.record_allocation(),
            None => self.stats.record_failed_allocation(),
        }
        block
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) {
        self.inner.deallocate(ptr);
        self.stats.record_deallocation();
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let block = self.inner.reallocate(ptr, new_size);
        match block {
            Some(_) => self.stats.record_reallocation(),
            None => self.stats.record_failed_allocation(),
        }
        block
    }

    fn allocate_zeroed(&self, nelem: usize, elem_size: usize) -> Option<NonNull<u8>> {
        let block = self.inner.allocate_zeroed(nelem, elem_size);
        match block {
            Some(_) => self.stats.record_zeroed_allocation(),
            None => self.stats.record_failed_allocation(),
        }
        block
    }
}
