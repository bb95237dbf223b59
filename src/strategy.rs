//! ## minne::strategy
//! **The complete-strategy contract every allocation backend implements**
//!
//! A strategy is a single value supplying all four heap operations; a
//! partially-populated strategy is unrepresentable. Implementations own
//! whatever context their operations need (pool handles, counters,
//! embedder state) as ordinary fields.
//!
//! `allocate_zeroed` ships with a provided implementation that
//! synthesizes the zero-fill guarantee through `allocate` plus an
//! explicit byte fill. Only a strategy whose `allocate` is the platform
//! heap's own may override it with the platform's zeroing primitive;
//! memory returned by an arbitrary backend carries no such guarantee.

use core::ptr::{self, NonNull};

/// A complete allocation strategy.
///
/// Installed strategies service every heap operation a client handle
/// performs. All methods execute synchronously on the calling thread and
/// never block beyond whatever the backing heap itself does.
///
/// # Safety
///
/// Implementations must uphold the heap contract:
/// * `allocate` and `allocate_zeroed` return either `None` or a pointer
///   to a live, exclusively-owned block of at least the requested size,
///   valid until passed to `deallocate` or `reallocate` of the same
///   strategy.
/// * `allocate_zeroed` returns memory with every byte zero across the
///   full `nelem * elem_size` extent.
/// * `reallocate` preserves the leading `min(old, new)` bytes of the
///   block and invalidates the old pointer on success.
pub unsafe trait Allocator: Send + Sync {
    /// Allocates `size` bytes. `None` signals exhaustion; it is a normal
    /// result value, not an error.
    fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

    /// Releases a block previously returned by this strategy.
    ///
    /// # Safety
    ///
    /// `ptr` must have been obtained from this strategy and not yet
    /// released. Same contract as the platform heap's `free`.
    unsafe fn deallocate(&self, ptr: NonNull<u8>);

    /// Resizes a block, or allocates a fresh one when `ptr` is `None`.
    ///
    /// # Safety
    ///
    /// A `Some` pointer must have been obtained from this strategy and
    /// not yet released. On success the old pointer is invalid.
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        new_size: usize,
    ) -> Option<NonNull<u8>>;

    /// Allocates `nelem * elem_size` bytes with every byte zero.
    ///
    /// The provided implementation routes through [`Allocator::allocate`]
    /// and fills the block explicitly, so the zero-fill guarantee holds
    /// no matter which backend is active. Overflow of the byte count is
    /// reported as exhaustion.
    fn allocate_zeroed(&self, nelem: usize, elem_size: usize) -> Option<NonNull<u8>> {
        let total = nelem.checked_mul(elem_size)?;
        let block = self.allocate(total)?;
        // SAFETY: `allocate` just returned a live block of `total` bytes.
        unsafe { ptr::write_bytes(block.as_ptr(), 0, total) };
        Some(block)
    }
}
