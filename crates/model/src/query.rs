//! Dotted-path element queries over resource content.
//!
//! An [`ElementQuery`] walks a payload's body along a dotted path such as
//! `Patient.managingOrganization`, descending through objects and
//! flattening arrays at every step, and invokes a callback once per
//! matched element. The leading segment names the resource type and is
//! consumed before walking; callers are expected to validate it against
//! the payload's actual type.

use serde_json::Value;

use crate::resource::Resource;

/// A compiled dotted-path expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementQuery {
    segments: Vec<String>,
}

impl ElementQuery {
    /// Compile a dotted path such as `Patient.contact.organization`.
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// The leading segment: the resource-type name the path applies to.
    pub fn head(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Visit every element reachable via this path, in document order.
    ///
    /// Arrays are flattened at each step, so a path through a repeating
    /// field visits each repetition. A path that matches nothing simply
    /// produces no visits - that is a valid outcome, not an error. A path
    /// with no segments beyond the type name also visits nothing: paths
    /// name fields, not whole resources.
    pub fn visit<'a, F>(&self, resource: &'a Resource, mut callback: F)
    where
        F: FnMut(&'a Value),
    {
        let mut segments = self.segments.iter().skip(1);
        let Some(first) = segments.next() else {
            return;
        };

        let mut frontier: Vec<&'a Value> = Vec::new();
        if let Some(value) = resource.content.get(first.as_str()) {
            push_flattened(value, &mut frontier);
        }

        for segment in segments {
            let mut next = Vec::new();
            for value in frontier {
                if let Some(child) = value.get(segment.as_str()) {
                    push_flattened(child, &mut next);
                }
            }
            frontier = next;
        }

        for value in frontier {
            callback(value);
        }
    }
}

/// Push a value, splitting arrays into their elements.
fn push_flattened<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_flattened(item, out);
            }
        }
        other => out.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient() -> Resource {
        Resource::new("Patient")
            .with_id("1")
            .with_field(
                "managingOrganization",
                json!({ "reference": "Organization/1" }),
            )
            .with_field(
                "generalPractitioner",
                json!([
                    { "reference": "Practitioner/a" },
                    { "reference": "Practitioner/b" }
                ]),
            )
            .with_field(
                "contact",
                json!([
                    { "organization": { "reference": "Organization/2" } },
                    { "organization": { "reference": "Organization/3" } }
                ]),
            )
    }

    fn collect(resource: &Resource, path: &str) -> Vec<Value> {
        let mut found = Vec::new();
        ElementQuery::new(path).visit(resource, |value| found.push(value.clone()));
        found
    }

    #[test]
    fn exposes_the_type_segment_as_head() {
        assert_eq!(
            ElementQuery::new("Patient.managingOrganization").head(),
            Some("Patient")
        );
        assert_eq!(ElementQuery::new("").head(), None);
    }

    #[test]
    fn visits_a_single_field() {
        let found = collect(&patient(), "Patient.managingOrganization");
        assert_eq!(found, vec![json!({ "reference": "Organization/1" })]);
    }

    #[test]
    fn flattens_repeating_fields_in_order() {
        let found = collect(&patient(), "Patient.generalPractitioner");
        assert_eq!(
            found,
            vec![
                json!({ "reference": "Practitioner/a" }),
                json!({ "reference": "Practitioner/b" })
            ]
        );
    }

    #[test]
    fn descends_through_nested_repeating_fields() {
        let found = collect(&patient(), "Patient.contact.organization");
        assert_eq!(
            found,
            vec![
                json!({ "reference": "Organization/2" }),
                json!({ "reference": "Organization/3" })
            ]
        );
    }

    #[test]
    fn yields_nothing_for_an_unmatched_path() {
        assert!(collect(&patient(), "Patient.link.other").is_empty());
    }

    #[test]
    fn yields_nothing_for_a_type_only_path() {
        assert!(collect(&patient(), "Patient").is_empty());
    }
}
