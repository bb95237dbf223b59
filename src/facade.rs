//! ## minne::facade
//! **The single call surface for all heap traffic**
//!
//! Library code never talks to a strategy or the registry directly; it
//! calls these four functions against whatever handle it holds. Each
//! call resolves the handle's effective strategy and forwards verbatim:
//! no retry, no logging, no error translation, no bookkeeping
//! allocation. A `None` result is exhaustion and is passed through for
//! the caller to handle.

use core::ptr::NonNull;

use crate::registry::Allocators;

/// Anything that owns an allocation strategy slot.
///
/// Client objects (connections, configuration objects) implement this so
/// the facade can route their heap traffic.
pub trait AllocatorHandle {
    fn allocators(&self) -> &Allocators;
}

impl AllocatorHandle for Allocators {
    fn allocators(&self) -> &Allocators {
        self
    }
}

/// Allocates `size` bytes through the handle's effective strategy.
#[inline]
pub fn allocate<H: AllocatorHandle + ?Sized>(handle: &H, size: usize) -> Option<NonNull<u8>> {
    handle.allocators().effective().allocate(size)
}

/// Releases a block through the handle's effective strategy.
///
/// # Safety
///
/// `ptr` must have been obtained through the strategy currently
/// effective for `handle` and not yet released.
#[inline]
pub unsafe fn deallocate<H: AllocatorHandle + ?Sized>(handle: &H, ptr: NonNull<u8>) {
    handle.allocators().effective().deallocate(ptr)
}

/// Resizes a block through the handle's effective strategy. `None` for
/// `ptr` allocates a fresh block.
///
/// # Safety
///
/// A `Some` pointer must have been obtained through the strategy
/// currently effective for `handle` and not yet released.
#[inline]
pub unsafe fn reallocate<H: AllocatorHandle + ?Sized>(
    handle: &H,
    ptr: Option<NonNull<u8>>,
    new_size: usize,
) -> Option<NonNull<u8>> {
    handle.allocators().effective().reallocate(ptr, new_size)
}

/// Allocates `nelem * elem_size` zeroed bytes through the handle's
/// effective strategy.
#[inline]
pub fn allocate_zeroed<H: AllocatorHandle + ?Sized>(
    handle: &H,
    nelem: usize,
    elem_size: usize,
) -> Option<NonNull<u8>> {
    handle.allocators().effective().allocate_zeroed(nelem, elem_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Allocator;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Strategy that records which operation ran; memory comes from the
    /// platform heap so blocks stay genuinely usable.
    #[derive(Default)]
    struct Recording {
        allocate: AtomicUsize,
        deallocate: AtomicUsize,
        reallocate: AtomicUsize,
        allocate_zeroed: AtomicUsize,
    }

    unsafe impl Allocator for Recording {
        fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
            self.allocate.fetch_add(1, Ordering::Relaxed);
            NonNull::new(unsafe { libc::malloc(size) }.cast::<u8>())
        }

        unsafe fn deallocate(&self, ptr: NonNull<u8>) {
            self.deallocate.fetch_add(1, Ordering::Relaxed);
            libc::free(ptr.as_ptr().cast());
        }

        unsafe fn reallocate(
            &self,
            ptr: Option<NonNull<u8>>,
            new_size: usize,
        ) -> Option<NonNull<u8>> {
            self.reallocate.fetch_add(1, Ordering::Relaxed);
            let raw = ptr.map_or(core::ptr::null_mut(), |p| p.as_ptr().cast());
            NonNull::new(libc::realloc(raw, new_size).cast::<u8>())
        }

        fn allocate_zeroed(&self, nelem: usize, elem_size: usize) -> Option<NonNull<u8>> {
            self.allocate_zeroed.fetch_add(1, Ordering::Relaxed);
            NonNull::new(unsafe { libc::calloc(nelem, elem_size) }.cast::<u8>())
        }
    }

    #[test]
    fn default_path_is_the_platform_heap() {
        let slot = Allocators::new();
        let block = allocate(&slot, 48).expect("allocation");
        // Interchangeable with a direct platform free.
        unsafe { libc::free(block.as_ptr().cast()) };
    }

    #[test]
    fn each_operation_reaches_its_registered_counterpart() {
        let strategy = Arc::new(Recording::default());
        let mut slot = Allocators::new();
        slot.install(strategy.clone());

        let block = allocate(&slot, 16).expect("allocation");
        let block = unsafe { reallocate(&slot, Some(block), 64) }.expect("reallocation");
        unsafe { deallocate(&slot, block) };
        let zeroed = allocate_zeroed(&slot, 2, 8).expect("allocation");
        unsafe { deallocate(&slot, zeroed) };

        assert_eq!(strategy.allocate.load(Ordering::Relaxed), 1);
        assert_eq!(strategy.reallocate.load(Ordering::Relaxed), 1);
        assert_eq!(strategy.deallocate.load(Ordering::Relaxed), 2);
        assert_eq!(strategy.allocate_zeroed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn exhaustion_passes_through_unchanged() {
        struct Exhausted;
        unsafe impl Allocator for Exhausted {
            fn allocate(&self, _size: usize) -> Option<NonNull<u8>> {
                None
            }
            unsafe fn deallocate(&self, _ptr: NonNull<u8>) {}
            unsafe fn reallocate(
                &self,
                _ptr: Option<NonNull<u8>>,
                _new_size: usize,
            ) -> Option<NonNull<u8>> {
                None
            }
        }

        let mut slot = Allocators::new();
        slot.install(Arc::new(Exhausted));
        assert!(allocate(&slot, 1).is_none());
        assert!(unsafe { reallocate(&slot, None, 1) }.is_none());
        // Synthesized zeroed path rides on allocate, so it is exhausted too.
        assert!(allocate_zeroed(&slot, 1, 1).is_none());
    }
}
