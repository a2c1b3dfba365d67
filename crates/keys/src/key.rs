//! Identity keys for resource occurrences.
//!
//! A [`Key`] names one occurrence of a resource: its type, its id, an
//! optional version, and an optional base URL locating the store the id
//! belongs to. Keys are immutable values; operations that "change" a key
//! (such as supplementing a missing base) return a new value.

use std::fmt;

use uuid::Uuid;

/// Locality of a key relative to the serving store's identity space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    /// Absolute identity pointing at this store.
    Local,
    /// Relative identity, implicitly belonging to this store.
    Internal,
    /// Placeholder identity (`urn:uuid:` / `urn:oid:`) that only exists
    /// within a single message.
    Temporary,
    /// Absolute identity pointing at another store.
    Foreign,
}

/// Identity of a resource occurrence.
///
/// All components are optional except in spirit: a key parsed from a
/// well-formed reference always carries a type name, and a temporary key
/// carries its whole urn in the id component with no type at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    base: Option<String>,
    type_name: Option<String>,
    resource_id: Option<String>,
    version_id: Option<String>,
}

impl Key {
    /// Create a key from raw components. The base, when present, is stored
    /// without a trailing slash so that equality is not sensitive to it.
    pub fn new(
        base: Option<String>,
        type_name: Option<String>,
        resource_id: Option<String>,
        version_id: Option<String>,
    ) -> Self {
        Self {
            base: base.map(|b| b.trim_end_matches('/').to_owned()),
            type_name,
            resource_id,
            version_id,
        }
    }

    /// A relative (base-less) key for `Type/id`.
    pub fn local(type_name: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::new(None, Some(type_name.into()), Some(resource_id.into()), None)
    }

    /// A relative key for `Type/id/_history/vid`.
    pub fn versioned(
        type_name: impl Into<String>,
        resource_id: impl Into<String>,
        version_id: impl Into<String>,
    ) -> Self {
        Self::new(
            None,
            Some(type_name.into()),
            Some(resource_id.into()),
            Some(version_id.into()),
        )
    }

    /// An absolute key rooted at another store's base.
    pub fn foreign(
        base: impl Into<String>,
        type_name: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self::new(
            Some(base.into()),
            Some(type_name.into()),
            Some(resource_id.into()),
            None,
        )
    }

    /// Mint a temporary `urn:uuid:` identity for a resource that has not
    /// yet been assigned a durable id.
    pub fn temporary(uuid: Uuid) -> Self {
        Self::new(None, None, Some(format!("urn:uuid:{uuid}")), None)
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    pub fn has_base(&self) -> bool {
        self.base.is_some()
    }

    pub fn has_version(&self) -> bool {
        self.version_id.is_some()
    }

    /// Whether the id component is a message-scoped placeholder identity.
    pub fn is_temporary(&self) -> bool {
        self.resource_id
            .as_deref()
            .is_some_and(is_temporary_reference)
    }

    /// Clone-and-supplement: return a key whose absent base is filled with
    /// the supplied base. A key that already carries a base is returned
    /// unchanged.
    pub fn with_base(&self, base: &str) -> Key {
        if self.has_base() {
            return self.clone();
        }
        let mut key = self.clone();
        key.base = Some(base.trim_end_matches('/').to_owned());
        key
    }

    /// Return the same identity without its version component.
    pub fn without_version(&self) -> Key {
        let mut key = self.clone();
        key.version_id = None;
        key
    }

    /// Identity equality as used for de-duplication: base, type and id
    /// must match. The version is deliberately excluded, so two versions
    /// of the same occurrence compare as interchangeable.
    pub fn equal_to(&self, other: &Key) -> bool {
        self.base == other.base
            && self.type_name == other.type_name
            && self.resource_id == other.resource_id
    }

    /// Hashable form of the de-duplication identity (version excluded).
    pub fn identity(&self) -> KeyIdentity {
        KeyIdentity {
            base: self.base.clone(),
            type_name: self.type_name.clone(),
            resource_id: self.resource_id.clone(),
        }
    }

    /// Canonical URI rendering: `[base/]Type/id[/_history/vid]`.
    /// Temporary keys render their urn verbatim.
    pub fn to_uri(&self) -> String {
        if self.is_temporary() {
            return self.resource_id.clone().unwrap_or_default();
        }

        let mut uri = String::new();
        if let Some(base) = &self.base {
            uri.push_str(base);
        }
        if let Some(type_name) = &self.type_name {
            if !uri.is_empty() {
                uri.push('/');
            }
            uri.push_str(type_name);
        }
        if let Some(resource_id) = &self.resource_id {
            if !uri.is_empty() {
                uri.push('/');
            }
            uri.push_str(resource_id);
        }
        if let Some(version_id) = &self.version_id {
            uri.push_str("/_history/");
            uri.push_str(version_id);
        }
        uri
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

/// De-duplication identity of a [`Key`]: base, type and id. Suitable as a
/// hash map/set key for near-linear distinct filtering.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyIdentity {
    base: Option<String>,
    type_name: Option<String>,
    resource_id: Option<String>,
}

/// Whether a reference string is a message-scoped placeholder identity.
pub(crate) fn is_temporary_reference(reference: &str) -> bool {
    reference.starts_with("urn:uuid:") || reference.starts_with("urn:oid:")
}
