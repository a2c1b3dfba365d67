//! One unit of REST work against a resource store.
//!
//! An [`Interaction`] pairs a verb, an identity key, an optional payload
//! and a lifecycle state. Interactions are otherwise-immutable values:
//! the operations that "change" one (supplementing a base, marking it
//! transferred) return a new value rather than writing fields in place,
//! so ownership stays unambiguous.

use crx_keys::Key;
use crx_model::{HttpVerb, Resource};

use crate::{EngineError, EngineResult};

/// Lifecycle state of an interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    /// Not yet moved anywhere; eligible for batching into a container.
    Undefined,
    /// Already crossed a bundle boundary; must not be re-batched.
    Transferred,
}

impl InteractionState {
    /// Fail fatally when the state does not match what the call site
    /// assumes. A mismatch is a programming error, not a data problem.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidState`] on mismatch.
    pub fn assert(self, expected: InteractionState) -> EngineResult<()> {
        if self == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                expected,
                found: self,
            })
        }
    }
}

/// A verb, an identity, an optional payload and a lifecycle state.
///
/// The key is absent only when the interaction has no addressable
/// identity at all (a raw create with no id); the payload is absent for
/// identity-only work such as deletes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interaction {
    method: HttpVerb,
    key: Option<Key>,
    resource: Option<Resource>,
    state: InteractionState,
}

impl Interaction {
    /// Construct an interaction in the `Undefined` lifecycle state.
    pub fn new(method: HttpVerb, key: Option<Key>, resource: Option<Resource>) -> Self {
        Self {
            method,
            key,
            resource,
            state: InteractionState::Undefined,
        }
    }

    /// Identity-only work item (no payload), e.g. a delete or read.
    pub fn of_key(method: HttpVerb, key: Key) -> Self {
        Self::new(method, Some(key), None)
    }

    /// Payload-only work item with no addressable identity (raw create).
    pub fn of_resource(method: HttpVerb, resource: Resource) -> Self {
        Self::new(method, None, Some(resource))
    }

    pub fn method(&self) -> HttpVerb {
        self.method
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.method == HttpVerb::Delete
    }

    /// Whether the interaction leaves a resource present in the store.
    pub fn present(&self) -> bool {
        matches!(self.method, HttpVerb::Post | HttpVerb::Put)
    }

    /// Return an interaction whose key's absent base is filled from the
    /// containing bundle. A keyless interaction, or one whose key already
    /// carries a base, comes back unchanged.
    pub fn supplement_base(&self, base: &str) -> Interaction {
        match &self.key {
            Some(key) if !key.has_base() => Interaction {
                key: Some(key.with_base(base)),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Return the interaction marked as having crossed a bundle boundary.
    pub fn mark_transferred(&self) -> Interaction {
        Interaction {
            state: InteractionState::Transferred,
            ..self.clone()
        }
    }

    /// Convenience for [`InteractionState::assert`] on this interaction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidState`] on mismatch.
    pub fn assert_state(&self, expected: InteractionState) -> EngineResult<()> {
        self.state.assert(expected)
    }
}
