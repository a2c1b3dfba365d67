//! FHIR wire models for the CRX engine.
//!
//! This crate provides the **wire structures** exchanged at the bundle
//! boundary and the helpers needed to move identity between them:
//! - the [`Bundle`] container and its entries (request/response/resource)
//! - the minimal self-identifying [`Resource`] payload with opaque content
//! - the [`ElementQuery`] dotted-path visitor over resource content
//!
//! This crate focuses on:
//! - serialisation/deserialisation of the FHIR JSON wire format
//! - translation between identity keys and payload self-identity
//!
//! It performs no transport and no storage; higher layers decide what the
//! structures mean.

pub mod bundle;
pub mod query;
pub mod resource;

pub use bundle::{Bundle, BundleEntry, BundleType, EntryRequest, EntryResponse, HttpVerb};
pub use query::ElementQuery;
pub use resource::{Meta, Resource};

/// Errors returned by the `crx-model` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;
