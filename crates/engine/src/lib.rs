//! # CRX Engine
//!
//! Reconciliation between internal REST work items and wire-level bundles.
//!
//! This crate contains pure in-memory operations:
//! - [`Interaction`]: one unit of REST work against a resource store
//!   (verb + identity + optional payload + lifecycle state)
//! - verb resolution from a key's locality
//! - bundle translation in both directions, dispatching on bundle shape
//! - collection operations over interaction lists (distinct append,
//!   payload projection, reference extraction, transfer eligibility)
//!
//! **No transport or storage concerns**: everything here is a finite,
//! synchronous transformation over caller-supplied data.

pub mod interaction;
pub mod ops;
pub mod translate;
pub mod verb;

pub use interaction::{Interaction, InteractionState};
pub use translate::{append, append_all, replace, Translator};
pub use verb::verb_for_kind;

// Re-export the boundary types callers need alongside the engine.
pub use crx_keys::{Key, KeyKind, Localhost, ServerBase};
pub use crx_model::{Bundle, BundleEntry, BundleType, HttpVerb, Resource};

/// Errors returned by the `crx-engine` crate.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A lifecycle-state invariant did not hold. This signals a
    /// programming error in the caller, not a data problem; the current
    /// operation must be aborted.
    #[error("interaction was in an invalid state: expected {expected:?}, found {found:?}")]
    InvalidState {
        expected: InteractionState,
        found: InteractionState,
    },
}

/// Type alias for Results that can fail with an [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
