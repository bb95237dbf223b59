//! ## minne::registry
//! **Per-handle strategy slot**
//!
//! Every client handle owns exactly one [`Allocators`] slot. The slot is
//! created absent (the default strategy is effective), replaced only as
//! a whole, and dropped with its handle; dropping never runs a
//! strategy's deallocate against the slot itself.
//!
//! Mutation requires `&mut self`, which encodes the intended usage in
//! the type system: a strategy is configured once while the handle is
//! being set up, before the handle is shared across threads.

use std::sync::Arc;

use tracing::debug;

use crate::error::HooksError;
use crate::hooks::HookSet;
use crate::strategy::Allocator;
use crate::system;

/// The allocation strategy slot of a client handle.
#[derive(Default)]
pub struct Allocators {
    custom: Option<Arc<dyn Allocator>>,
}

impl Allocators {
    /// A fresh slot with no custom strategy; the default strategy is
    /// effective.
    pub fn new() -> Self {
        Self { custom: None }
    }

    /// Installs `strategy` for this handle, replacing any prior strategy
    /// as a whole.
    pub fn install(&mut self, strategy: Arc<dyn Allocator>) {
        debug!(target: "minne::registry", "installing custom allocation strategy");
        self.custom = Some(strategy);
    }

    /// Removes any custom strategy, making the default effective again.
    ///
    /// Returns the evicted strategy so the caller can tear down whatever
    /// context it owns.
    pub fn reset(&mut self) -> Option<Arc<dyn Allocator>> {
        let evicted = self.custom.take();
        if evicted.is_some() {
            debug!(target: "minne::registry", "reverting to default allocation strategy");
        }
        evicted
    }

    /// Registers a callback table.
    ///
    /// All four hooks set installs them together with their context; all
    /// four unset resets to the default strategy and discards the
    /// context. A partial set is rejected and the slot is left exactly
    /// as it was: validation happens before any mutation, so no partial
    /// state is observable even transiently.
    pub fn set_hooks<C>(&mut self, hooks: HookSet<C>) -> Result<(), HooksError>
    where
        C: Send + Sync + 'static,
    {
        match hooks.into_allocator()? {
            Some(strategy) => self.install(Arc::new(strategy)),
            None => {
                self.reset();
            }
        }
        Ok(())
    }

    /// The currently effective strategy: the installed one, or the
    /// process-wide default.
    pub fn effective(&self) -> &dyn Allocator {
        match &self.custom {
            Some(strategy) => strategy.as_ref(),
            None => &system::SYSTEM,
        }
    }

    /// The installed strategy object, if any. The object is also the
    /// context its operations run against.
    pub fn custom(&self) -> Option<&Arc<dyn Allocator>> {
        self.custom.as_ref()
    }

    /// Whether a custom strategy is installed.
    pub fn is_custom(&self) -> bool {
        self.custom.is_some()
    }
}
