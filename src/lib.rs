//! # minne
//!
//! Allocator indirection layer for cache-client libraries.
//! Built so library internals never branch on whether an embedder
//! customized memory management.
//!
//! ### Expectations (Production):
//! - Single synchronous dispatch per heap operation, no locking
//! - Zero bookkeeping allocations in the facade path
//! - Complete-or-absent strategies; partial customization is
//!   unrepresentable on the primary path and rejected at the hook seam
//!
//! ### Key Submodules:
//! - `strategy`: the [`Allocator`] contract with synthesized zero-fill
//! - `system`: platform-heap default strategy (`static`, race-free)
//! - `hooks`: callback-table bridge with all-or-none validation
//! - `registry`: per-handle strategy slot
//! - `facade`: the four dispatch functions library code calls
//! - `stats`: traffic counters and the counting wrapper strategy

pub mod error;
pub mod facade;
pub mod hooks;
pub mod registry;
pub mod stats;
pub mod strategy;
pub mod system;

pub use error::HooksError;
pub use facade::AllocatorHandle;
pub use registry::Allocators;
pub use strategy::Allocator;
pub use system::SystemAllocator;

pub mod prelude {
    pub use crate::error::HooksError;
    pub use crate::facade::{allocate, allocate_zeroed, deallocate, reallocate, AllocatorHandle};
    pub use crate::hooks::{HookAllocator, HookSet};
    pub use crate::registry::Allocators;
    pub use crate::stats::{AllocStats, CountingAllocator, StatsSnapshot};
    pub use crate::strategy::Allocator;
    pub use crate::system::{SystemAllocator, SYSTEM};
}
