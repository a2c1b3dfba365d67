//! Minimal self-identifying resource payload.
//!
//! The full resource domain schema lives elsewhere; this module carries
//! only what the bundle boundary needs from a payload:
//! - its self-identity (type name, id, version via `meta`)
//! - its remaining content, preserved as opaque JSON
//!
//! Responsibilities:
//! - serialisation/deserialisation of the wire shape
//! - extracting a [`Key`] from a payload's self-identity
//! - stamping a [`Key`] onto a payload (overwriting its identity fields)

use chrono::{DateTime, Utc};
use crx_keys::Key;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ModelError, ModelResult};

// ============================================================================
// Wire-facing types
// ============================================================================

/// Resource metadata: the version id and last-updated instant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(rename = "versionId", skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    #[serde(rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A resource payload: self-identity plus opaque body content.
///
/// Unknown body fields are deliberately preserved (resources are open
/// content), so a parse/render round trip is lossless.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "resourceType")]
    pub type_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl Resource {
    /// Create an empty resource of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: None,
            meta: None,
            content: Map::new(),
        }
    }

    /// Builder-style id assignment, used when constructing payloads.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style version assignment; creates `meta` on demand.
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.meta.get_or_insert_with(Meta::default).version_id = Some(version_id.into());
        self
    }

    /// Builder-style body field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.content.insert(name.into(), value);
        self
    }

    pub fn version_id(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.version_id.as_deref())
    }

    /// Derive an identity [`Key`] from the payload's self-identity.
    ///
    /// The key is always base-less: a payload does not know which store it
    /// lives in. An absent id yields a key with an absent id, which is a
    /// valid state, not an error.
    pub fn extract_key(&self) -> Key {
        Key::new(
            None,
            Some(self.type_name.clone()),
            self.id.clone(),
            self.version_id().map(str::to_owned),
        )
    }

    /// Stamp a key's identity onto this payload, overwriting the type, id
    /// and version fields. Components absent from the key leave the
    /// payload's corresponding field untouched.
    pub fn apply_key(&mut self, key: &Key) {
        if let Some(type_name) = key.type_name() {
            self.type_name = type_name.to_owned();
        }
        if let Some(id) = key.resource_id() {
            self.id = Some(id.to_owned());
        }
        if let Some(version_id) = key.version_id() {
            self.meta.get_or_insert_with(Meta::default).version_id = Some(version_id.to_owned());
        }
    }

    /// Parse a resource from JSON text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path"
    /// (e.g. `meta.versionId`) to the failing field when the JSON does not
    /// match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the JSON is not a resource object or the
    /// identity fields have unexpected types.
    pub fn parse(json_text: &str) -> ModelResult<Resource> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        let resource = match serde_path_to_error::deserialize::<_, Resource>(&mut deserializer) {
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
                    "Resource schema mismatch at {path}: {source}"
                )));
            }
        };

        if resource.type_name.trim().is_empty() {
            return Err(ModelError::InvalidInput(
                "resourceType cannot be empty".into(),
            ));
        }

        Ok(resource)
    }

    /// Render a resource as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if serialisation fails.
    pub fn render(&self) -> ModelResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ModelError::Translation(format!("Failed to serialise resource: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_with_unknown_body_fields() {
        let input = r#"{
            "resourceType": "Patient",
            "id": "1",
            "meta": { "versionId": "2", "lastUpdated": "2026-01-23T13:58:04Z" },
            "active": true,
            "name": [{ "family": "Williams" }]
        }"#;

        let resource = Resource::parse(input).expect("parse resource");
        assert_eq!(resource.type_name, "Patient");
        assert_eq!(resource.id.as_deref(), Some("1"));
        assert_eq!(resource.version_id(), Some("2"));
        assert_eq!(resource.content.get("active"), Some(&json!(true)));

        let output = resource.render().expect("render resource");
        let reparsed = Resource::parse(&output).expect("reparse resource");
        assert_eq!(resource, reparsed);
    }

    #[test]
    fn parse_reports_the_failing_path() {
        let input = r#"{ "resourceType": "Patient", "meta": { "versionId": 5 } }"#;

        let err = Resource::parse(input).expect_err("should reject numeric versionId");
        match err {
            ModelError::Translation(msg) => {
                assert!(msg.contains("versionId"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_an_empty_resource_type() {
        let err = Resource::parse(r#"{ "resourceType": "  " }"#)
            .expect_err("should reject blank resourceType");
        match err {
            ModelError::InvalidInput(msg) => assert!(msg.contains("resourceType")),
            other => panic!("expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn extracts_a_base_less_key() {
        let resource = Resource::new("Patient").with_id("1").with_version("3");
        let key = resource.extract_key();
        assert!(key.base().is_none());
        assert_eq!(key.type_name(), Some("Patient"));
        assert_eq!(key.resource_id(), Some("1"));
        assert_eq!(key.version_id(), Some("3"));
    }

    #[test]
    fn extracts_a_key_without_id_from_an_unidentified_payload() {
        let key = Resource::new("Patient").extract_key();
        assert_eq!(key.type_name(), Some("Patient"));
        assert!(key.resource_id().is_none());
    }

    #[test]
    fn apply_key_overwrites_identity_fields() {
        let mut resource = Resource::new("Patient").with_id("old");
        resource.apply_key(&Key::versioned("Patient", "1", "4"));
        assert_eq!(resource.id.as_deref(), Some("1"));
        assert_eq!(resource.version_id(), Some("4"));
    }

    #[test]
    fn apply_key_creates_meta_on_demand() {
        let mut resource = Resource::new("Patient");
        assert!(resource.meta.is_none());
        resource.apply_key(&Key::versioned("Patient", "1", "4"));
        assert_eq!(resource.version_id(), Some("4"));
    }

    #[test]
    fn apply_key_leaves_fields_absent_from_the_key() {
        let mut resource = Resource::new("Patient").with_id("1").with_version("4");
        resource.apply_key(&Key::new(None, Some("Patient".into()), None, None));
        assert_eq!(resource.id.as_deref(), Some("1"));
        assert_eq!(resource.version_id(), Some("4"));
    }
}
