//! Bundle container wire models and parse/render helpers.
//!
//! A bundle is a shape-polymorphic container: the same structure carries
//! different required sub-structures depending on its type discriminator.
//! This module only models the shapes; deciding which sub-structures to
//! populate per shape is the translation layer's concern.
//!
//! Responsibilities:
//! - Define the bundle type discriminator as a closed enum
//! - Define entry sub-structures (request, response, resource)
//! - Provide strict JSON parse/render with pathful errors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::{ModelError, ModelResult};

// ============================================================================
// Wire vocabulary
// ============================================================================

/// Wire verb carried by an entry's request sub-structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

/// Bundle type discriminator.
///
/// Closed enum: adding a shape is a compile-time-checked change at every
/// match site, never a silent fallthrough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    History,
    Searchset,
    Collection,
}

// ============================================================================
// Container structures
// ============================================================================

/// Request sub-structure of an entry: the verb and the addressed URL.
///
/// Both components are optional on the wire; the translation layer decides
/// what an absence means.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpVerb>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Response sub-structure of an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(rename = "lastModified", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// One entry of a bundle: optional request and/or response sub-structures
/// plus an optional payload. An entry with payload only is a *sparse*
/// entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<EntryRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<EntryResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

/// A bundle: type discriminator, optional base URL, snapshot total, and an
/// ordered entry sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bundle {
    pub bundle_type: BundleType,
    pub base: Option<String>,
    pub total: Option<u64>,
    pub entries: Vec<BundleEntry>,
}

impl Bundle {
    /// Create an empty bundle of the given type.
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            bundle_type,
            base: None,
            total: None,
            entries: Vec::new(),
        }
    }

    /// Builder-style base assignment, used when constructing containers.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Parse a bundle from JSON text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path"
    /// (e.g. `entry.0.request.method`) to the failing field when the JSON
    /// does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if:
    /// - the JSON does not represent a valid bundle,
    /// - any field has an unexpected type,
    /// - any unknown keys are present (due to `#[serde(deny_unknown_fields)]`),
    /// - resourceType is not "Bundle".
    pub fn parse(json_text: &str) -> ModelResult<Bundle> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        let wire = match serde_path_to_error::deserialize::<_, BundleWire>(&mut deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(ModelError::Translation(format!(
                    "Bundle schema mismatch at {path}: {source}"
                )));
            }
        };

        // Validate resourceType
        if wire.resource_type != "Bundle" {
            return Err(ModelError::InvalidInput(format!(
                "Expected resourceType 'Bundle', got '{}'",
                wire.resource_type
            )));
        }

        Ok(wire_to_domain(wire))
    }

    /// Render a bundle as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if serialisation fails.
    pub fn render(&self) -> ModelResult<String> {
        let wire = domain_to_wire(self);
        serde_json::to_string(&wire)
            .map_err(|e| ModelError::Translation(format!("Failed to serialise bundle: {e}")))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Wire representation of a bundle.
///
/// This is the exact structure serialised to/from JSON; the only
/// difference from the domain [`Bundle`] is the `resourceType` tag.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct BundleWire {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: BundleWire) -> Bundle {
    Bundle {
        bundle_type: wire.bundle_type,
        base: wire.base,
        total: wire.total,
        entries: wire.entry,
    }
}

fn domain_to_wire(bundle: &Bundle) -> BundleWire {
    BundleWire {
        resource_type: "Bundle".to_owned(),
        bundle_type: bundle.bundle_type,
        base: bundle.base.clone(),
        total: bundle.total,
        entry: bundle.entries.clone(),
    }
}
