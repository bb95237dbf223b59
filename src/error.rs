//! Error types for strategy registration

use thiserror::Error;

/// Errors raised while reconfiguring a handle's allocation strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HooksError {
    /// Some but not all of the four hook slots were supplied. The slot
    /// being configured is left exactly as it was.
    #[error("incomplete allocation hook set, missing: {}", .missing.join(", "))]
    Incomplete {
        /// Names of the hook slots left unset.
        missing: Vec<&'static str>,
    },
}
