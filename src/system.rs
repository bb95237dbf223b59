//! ## minne::system
//! **Platform-heap strategy and process-wide default**
//!
//! `SystemAllocator` forwards straight to `malloc`/`free`/`realloc`/
//! `calloc`. It is zero-sized and immutable, so the process-wide
//! [`SYSTEM`] instance is an ordinary `static` with no lazy
//! materialization and no first-use race.

use core::ptr::{self, NonNull};

use crate::strategy::Allocator;

/// Allocation strategy backed by the platform heap.
///
/// This is the strategy in effect for every handle that has not
/// installed a custom one.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

/// The process-wide default strategy instance.
pub static SYSTEM: SystemAllocator = SystemAllocator;

unsafe impl Allocator for SystemAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        // Exhaustion surfaces as a null return from malloc; no retry, no
        // translation.
        NonNull::new(unsafe { libc::malloc(size) }.cast::<u8>())
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) {
        libc::free(ptr.as_ptr().cast());
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // realloc(NULL, n) is defined as malloc(n).
        let raw = ptr.map_or(ptr::null_mut(), |p| p.as_ptr().cast());
        NonNull::new(libc::realloc(raw, new_size).cast::<u8>())
    }

    fn allocate_zeroed(&self, nelem: usize, elem_size: usize) -> Option<NonNull<u8>> {
        // The platform's calloc is trusted to zero only here, where the
        // active allocate verifiably is the platform's own. calloc also
        // performs its own overflow check on nelem * elem_size.
        NonNull::new(unsafe { libc::calloc(nelem, elem_size) }.cast::<u8>())
    }
}
