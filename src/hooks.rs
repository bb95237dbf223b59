//! ## minne::hooks
//! **Callback-table bridge for embedders**
//!
//! Embedding applications that manage memory through a table of
//! callbacks (a typed context plus four functions) register it as a
//! [`HookSet`]. The set's slots are individually optional so the caller
//! can express "use the default" by leaving all of them unset, but a
//! strategy is only ever built from a *complete* set: supplying one,
//! two, or three hooks is rejected before anything is mutated.
//!
//! The context is a concrete type `C` owned by the resulting strategy
//! and handed to every hook by reference. Nothing in this layer inspects
//! it.

use core::ptr::NonNull;

use crate::error::HooksError;
use crate::strategy::Allocator;

/// Hook servicing `allocate`.
pub type AllocFn<C> = fn(&C, usize) -> Option<NonNull<u8>>;
/// Hook servicing `deallocate`.
pub type DeallocFn<C> = unsafe fn(&C, NonNull<u8>);
/// Hook servicing `reallocate`.
pub type ReallocFn<C> = unsafe fn(&C, Option<NonNull<u8>>, usize) -> Option<NonNull<u8>>;
/// Hook servicing `allocate_zeroed`. The hook owns the zero-fill
/// guarantee for the returned block.
pub type AllocZeroedFn<C> = fn(&C, usize, usize) -> Option<NonNull<u8>>;

/// A caller-supplied table of allocation hooks plus its context.
///
/// All four slots set yields a complete strategy; all four unset means
/// "use the default strategy" (the context is discarded); anything in
/// between is invalid.
pub struct HookSet<C> {
    /// State handed by reference to every hook invocation.
    pub context: C,
    pub allocate: Option<AllocFn<C>>,
    pub deallocate: Option<DeallocFn<C>>,
    pub reallocate: Option<ReallocFn<C>>,
    pub allocate_zeroed: Option<AllocZeroedFn<C>>,
}

impl<C> HookSet<C> {
    /// A set with no hooks populated: registering it resets the handle
    /// to the default strategy.
    pub fn empty(context: C) -> Self {
        Self {
            context,
            allocate: None,
            deallocate: None,
            reallocate: None,
            allocate_zeroed: None,
        }
    }

    /// A fully-populated set.
    pub fn complete(
        context: C,
        allocate: AllocFn<C>,
        deallocate: DeallocFn<C>,
        reallocate: ReallocFn<C>,
        allocate_zeroed: AllocZeroedFn<C>,
    ) -> Self {
        Self {
            context,
            allocate: Some(allocate),
            deallocate: Some(deallocate),
            reallocate: Some(reallocate),
            allocate_zeroed: Some(allocate_zeroed),
        }
    }

    /// Whether no hook slot is populated.
    pub fn is_empty(&self) -> bool {
        self.allocate.is_none()
            && self.deallocate.is_none()
            && self.reallocate.is_none()
            && self.allocate_zeroed.is_none()
    }

    /// Names of the unpopulated slots, in declaration order.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.allocate.is_none() {
            missing.push("allocate");
        }
        if self.deallocate.is_none() {
            missing.push("deallocate");
        }
        if self.reallocate.is_none() {
            missing.push("reallocate");
        }
        if self.allocate_zeroed.is_none() {
            missing.push("allocate_zeroed");
        }
        missing
    }

    /// Validates completeness and builds the strategy.
    ///
    /// `Ok(None)` is the all-unset case; `Ok(Some(_))` the all-set case.
    pub(crate) fn into_allocator(self) -> Result<Option<HookAllocator<C>>, HooksError> {
        if self.is_empty() {
            return Ok(None);
        }
        match (
            self.allocate,
            self.deallocate,
            self.reallocate,
            self.allocate_zeroed,
        ) {
            (Some(allocate), Some(deallocate), Some(reallocate), Some(allocate_zeroed)) => {
                Ok(Some(HookAllocator {
                    context: self.context,
                    allocate,
                    deallocate,
                    reallocate,
                    allocate_zeroed,
                }))
            }
            _ => Err(HooksError::Incomplete {
                missing: self.missing(),
            }),
        }
    }
}

/// Complete strategy built from a validated [`HookSet`].
///
/// Cannot be constructed with a missing hook, so once one of these
/// exists the all-or-none rule is already discharged.
pub struct HookAllocator<C> {
    context: C,
    allocate: AllocFn<C>,
    deallocate: DeallocFn<C>,
    reallocate: ReallocFn<C>,
    allocate_zeroed: AllocZeroedFn<C>,
}

impl<C> HookAllocator<C> {
    /// The context the hooks were registered with.
    pub fn context(&self) -> &C {
        &self.context
    }
}

unsafe impl<C: Send + Sync + 'static> Allocator for HookAllocator<C> {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        (self.allocate)(&self.context, size)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) {
        (self.deallocate)(&self.context, ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        (self.reallocate)(&self.context, ptr, new_size)
    }

    // Never synthesized for hook strategies: the registered zeroed hook
    // is always present and owns the zero-fill guarantee.
    fn allocate_zeroed(&self, nelem: usize, elem_size: usize) -> Option<NonNull<u8>> {
        (self.allocate_zeroed)(&self.context, nelem, elem_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;

    fn heap_alloc(_cx: &(), size: usize) -> Option<NonNull<u8>> {
        NonNull::new(unsafe { libc::malloc(size) }.cast::<u8>())
    }

    unsafe fn heap_dealloc(_cx: &(), ptr: NonNull<u8>) {
        libc::free(ptr.as_ptr().cast());
    }

    unsafe fn heap_realloc(
        _cx: &(),
        ptr: Option<NonNull<u8>>,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let raw = ptr.map_or(ptr::null_mut(), |p| p.as_ptr().cast());
        NonNull::new(libc::realloc(raw, new_size).cast::<u8>())
    }

    fn heap_calloc(_cx: &(), nelem: usize, elem_size: usize) -> Option<NonNull<u8>> {
        NonNull::new(unsafe { libc::calloc(nelem, elem_size) }.cast::<u8>())
    }

    fn set_for_mask(mask: u8) -> HookSet<()> {
        HookSet {
            context: (),
            allocate: (mask & 0b0001 != 0).then_some(heap_alloc as AllocFn<()>),
            deallocate: (mask & 0b0010 != 0).then_some(heap_dealloc as DeallocFn<()>),
            reallocate: (mask & 0b0100 != 0).then_some(heap_realloc as ReallocFn<()>),
            allocate_zeroed: (mask & 0b1000 != 0).then_some(heap_calloc as AllocZeroedFn<()>),
        }
    }

    #[test]
    fn empty_set_builds_no_strategy() {
        assert!(set_for_mask(0).into_allocator().unwrap().is_none());
        assert!(HookSet::empty(()).is_empty());
    }

    #[test]
    fn complete_set_builds_a_strategy() {
        let strategy = set_for_mask(0b1111).into_allocator().unwrap().unwrap();
        let block = strategy.allocate(24).expect("allocation");
        unsafe { strategy.deallocate(block) };
    }

    #[test]
    fn every_partial_combination_is_rejected() {
        for mask in 1..0b1111u8 {
            let set = set_for_mask(mask);
            let expected_missing = set.missing();
            match set.into_allocator() {
                Err(HooksError::Incomplete { missing }) => {
                    assert_eq!(missing, expected_missing, "mask {mask:#06b}");
                    assert_eq!(missing.len(), 4 - mask.count_ones() as usize);
                }
                Ok(_) => panic!("mask {mask:#06b} must not build a strategy"),
            }
        }
    }

    #[test]
    fn missing_reports_slots_in_declaration_order() {
        let set = set_for_mask(0b0101);
        assert_eq!(set.missing(), ["deallocate", "allocate_zeroed"]);
    }

    type Token = Box<u64>;

    fn boxed_alloc(_cx: &Token, size: usize) -> Option<NonNull<u8>> {
        NonNull::new(unsafe { libc::malloc(size) }.cast::<u8>())
    }

    unsafe fn boxed_dealloc(_cx: &Token, ptr: NonNull<u8>) {
        libc::free(ptr.as_ptr().cast());
    }

    unsafe fn boxed_realloc(
        _cx: &Token,
        ptr: Option<NonNull<u8>>,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let raw = ptr.map_or(ptr::null_mut(), |p| p.as_ptr().cast());
        NonNull::new(libc::realloc(raw, new_size).cast::<u8>())
    }

    fn boxed_calloc(_cx: &Token, nelem: usize, elem_size: usize) -> Option<NonNull<u8>> {
        NonNull::new(unsafe { libc::calloc(nelem, elem_size) }.cast::<u8>())
    }

    #[test]
    fn context_is_retained_by_identity() {
        let token: Token = Box::new(0xC0FFEE);
        let address: *const u64 = &*token;
        let strategy =
            HookSet::complete(token, boxed_alloc, boxed_dealloc, boxed_realloc, boxed_calloc)
                .into_allocator()
                .unwrap()
                .unwrap();
        assert_eq!(**strategy.context(), 0xC0FFEE);
        assert!(ptr::eq(&**strategy.context(), address));
    }
}
