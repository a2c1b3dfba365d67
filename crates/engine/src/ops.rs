//! Collection operations over interactions and resources.
//!
//! Everything here is a finite transformation over caller-supplied
//! collections: ordered and distinct appends, payload projection,
//! reference extraction and transfer eligibility. Nothing mutates an
//! interaction; only the target list grows.

use std::collections::HashSet;

use crx_keys::{Key, KeyIdentity};
use crx_model::{ElementQuery, Resource};

use crate::interaction::{Interaction, InteractionState};

/// Ordered append of every candidate.
pub fn append(list: &mut Vec<Interaction>, appendage: impl IntoIterator<Item = Interaction>) {
    list.extend(appendage);
}

/// Key-equality membership test (version ignored). An interaction without
/// a key is never reported as contained.
pub fn contains(list: &[Interaction], item: &Interaction) -> bool {
    let Some(key) = item.key() else {
        return false;
    };
    list.iter()
        .any(|existing| existing.key().is_some_and(|k| k.equal_to(key)))
}

/// Append each candidate unless an element with the same key identity is
/// already present: first-writer-wins. The identity index keeps this
/// near-linear instead of quadratic. Keyless candidates are always
/// appended.
pub fn append_distinct(
    list: &mut Vec<Interaction>,
    appendage: impl IntoIterator<Item = Interaction>,
) {
    let mut seen: HashSet<KeyIdentity> = list
        .iter()
        .filter_map(|i| i.key().map(Key::identity))
        .collect();

    for item in appendage {
        match item.key().map(Key::identity) {
            Some(identity) => {
                if seen.insert(identity) {
                    list.push(item);
                }
            }
            None => list.push(item),
        }
    }
}

/// Lazy projection of the payloads carried by a slice of interactions, in
/// input order. Re-traversing the source is safe: nothing is mutated.
pub fn resources(interactions: &[Interaction]) -> impl Iterator<Item = &Resource> {
    interactions.iter().filter_map(|i| i.resource())
}

/// Collect the reference strings reachable from `resource` via a dotted
/// path.
///
/// The path's leading segment must name the resource's own type;
/// otherwise the result is empty - a mismatch is not an error. Matched
/// elements contribute their `reference` value in visitation order.
pub fn references(resource: &Resource, path: &str) -> Vec<String> {
    let query = ElementQuery::new(path);
    if query.head() != Some(resource.type_name.as_str()) {
        return Vec::new();
    }

    let mut found = Vec::new();
    query.visit(resource, |element| {
        if let Some(reference) = element.get("reference").and_then(|v| v.as_str()) {
            found.push(reference.to_owned());
        }
    });
    found
}

/// [`references`] fanned out over a collection of resources, flattened in
/// resource order.
pub fn collection_references<'a>(
    resources: impl IntoIterator<Item = &'a Resource>,
    path: &str,
) -> Vec<String> {
    resources
        .into_iter()
        .flat_map(|resource| references(resource, path))
        .collect()
}

/// [`references`] fanned out over resources and paths. Iteration order is
/// paths-outer, resources-inner: all matches for the first path precede
/// any match for the second.
pub fn all_references<P: AsRef<str>>(resources: &[Resource], paths: &[P]) -> Vec<String> {
    paths
        .iter()
        .flat_map(|path| collection_references(resources, path.as_ref()))
        .collect()
}

/// The interactions still eligible to be moved into a new container:
/// those whose lifecycle state is `Undefined`.
pub fn transferable(interactions: &[Interaction]) -> impl Iterator<Item = &Interaction> {
    interactions
        .iter()
        .filter(|i| i.state() == InteractionState::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crx_model::HttpVerb;
    use serde_json::json;

    fn update(id: &str) -> Interaction {
        Interaction::new(
            HttpVerb::Put,
            Some(Key::local("Patient", id)),
            Some(Resource::new("Patient").with_id(id)),
        )
    }

    #[test]
    fn append_keeps_every_candidate_in_order() {
        let mut list = vec![update("1")];
        append(&mut list, vec![update("2"), update("1")]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn contains_uses_key_equality_not_payload_equality() {
        let list = vec![update("1")];

        // Same identity, different payload and version.
        let probe = Interaction::of_key(HttpVerb::Delete, Key::versioned("Patient", "1", "9"));
        assert!(contains(&list, &probe));

        let other = Interaction::of_key(HttpVerb::Put, Key::local("Patient", "2"));
        assert!(!contains(&list, &other));
    }

    #[test]
    fn contains_is_false_for_keyless_interactions() {
        let list = vec![update("1")];
        let keyless = Interaction::of_resource(HttpVerb::Post, Resource::new("Patient"));
        assert!(!contains(&list, &keyless));
    }

    #[test]
    fn append_distinct_is_idempotent() {
        let mut list = Vec::new();
        append_distinct(&mut list, vec![update("1")]);
        append_distinct(&mut list, vec![update("1")]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn append_distinct_ignores_version_differences() {
        let mut list = Vec::new();
        append_distinct(
            &mut list,
            vec![
                Interaction::of_key(HttpVerb::Put, Key::versioned("Patient", "1", "1")),
                Interaction::of_key(HttpVerb::Put, Key::versioned("Patient", "1", "2")),
            ],
        );
        // First writer wins.
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].key().and_then(Key::version_id), Some("1"));
    }

    #[test]
    fn append_distinct_always_appends_keyless_candidates() {
        let mut list = Vec::new();
        append_distinct(
            &mut list,
            vec![
                Interaction::of_resource(HttpVerb::Post, Resource::new("Patient")),
                Interaction::of_resource(HttpVerb::Post, Resource::new("Patient")),
            ],
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn resources_projects_payloads_in_order() {
        let list = vec![
            update("1"),
            Interaction::of_key(HttpVerb::Delete, Key::local("Patient", "2")),
            update("3"),
        ];

        let ids: Vec<_> = resources(&list)
            .map(|r| r.id.clone().expect("payload has an id"))
            .collect();
        assert_eq!(ids, vec!["1", "3"]);

        // Restartable: a second traversal sees the same projection.
        assert_eq!(resources(&list).count(), 2);
    }

    #[test]
    fn references_requires_a_matching_type_segment() {
        let observation = Resource::new("Observation")
            .with_field("subject", json!({ "reference": "Patient/1" }));
        assert!(references(&observation, "Patient.managingOrganization").is_empty());
        assert_eq!(
            references(&observation, "Observation.subject"),
            vec!["Patient/1"]
        );
    }

    #[test]
    fn references_collects_in_visitation_order() {
        let patient = Resource::new("Patient").with_field(
            "generalPractitioner",
            json!([
                { "reference": "Practitioner/a" },
                { "display": "no reference here" },
                { "reference": "Practitioner/b" }
            ]),
        );

        assert_eq!(
            references(&patient, "Patient.generalPractitioner"),
            vec!["Practitioner/a", "Practitioner/b"]
        );
    }

    #[test]
    fn all_references_iterates_paths_outer() {
        let resources = vec![
            Resource::new("Patient")
                .with_field("managingOrganization", json!({ "reference": "Organization/1" }))
                .with_field("generalPractitioner", json!({ "reference": "Practitioner/a" })),
            Resource::new("Patient")
                .with_field("managingOrganization", json!({ "reference": "Organization/2" })),
        ];
        let paths = ["Patient.managingOrganization", "Patient.generalPractitioner"];

        assert_eq!(
            all_references(&resources, &paths),
            vec!["Organization/1", "Organization/2", "Practitioner/a"]
        );
    }

    #[test]
    fn transferable_excludes_transferred_interactions() {
        let list = vec![update("1"), update("2").mark_transferred(), update("3")];

        let eligible: Vec<_> = transferable(&list)
            .map(|i| i.key().and_then(Key::resource_id).expect("key with id"))
            .collect();
        assert_eq!(eligible, vec!["1", "3"]);
    }
}
