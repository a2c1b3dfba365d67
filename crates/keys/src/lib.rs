//! Resource identity primitives for the CRX engine.
//!
//! This crate is a leaf: it defines the [`Key`] value naming a resource
//! occurrence (type, id, version, base), the locality classification of a
//! key relative to a serving store ([`KeyKind`]), and the [`Localhost`]
//! capability that parses resource-addressing URIs into keys.
//!
//! This crate focuses on:
//! - immutable identity values (keys are cloned, never mutated in place)
//! - URI parsing and canonical rendering
//! - the identity equality used for de-duplication (version excluded)
//!
//! It contains **no wire models and no I/O** - only typed identity values.

pub mod key;
pub mod localhost;

pub use key::{Key, KeyIdentity, KeyKind};
pub use localhost::{Localhost, ServerBase};

/// Errors returned by the `crx-keys` crate.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid base URL '{url}': {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("empty resource reference")]
    EmptyReference,

    #[error("malformed resource reference: {0}")]
    MalformedReference(String),
}

/// Type alias for Results that can fail with a [`KeyError`].
pub type KeyResult<T> = Result<T, KeyError>;
