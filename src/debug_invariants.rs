//! Structural self-checks for meshes.
//!
//! Meshes keep derived state (sorted order, id caches, triangle adjacency)
//! that must agree with their primary tables. `validate_invariants` walks
//! that state and reports the first disagreement; mutating methods call
//! `debug_invariants!` so debug builds catch corruption where it happens.

use crate::mesh_error::MeshError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "mesh");
    }
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Turn a failed condition into an [`MeshError::InvariantViolation`].
#[inline]
pub(crate) fn ensure<F>(cond: bool, msg: F) -> Result<(), MeshError>
where
    F: FnOnce() -> String,
{
    if cond {
        Ok(())
    } else {
        Err(MeshError::InvariantViolation(msg()))
    }
}

/// Panics with `ctx` if `$expr` is an `Err` and invariant checking is on.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
