//! Verb resolution from key locality.

use crx_keys::KeyKind;
use crx_model::HttpVerb;

/// The verb implied by a key's locality when the wire does not state one.
///
/// Foreign and temporary identities originate outside this store's
/// identity space, so their resources are appended as new (`POST`).
/// Internal and local identities are assumed to already exist (`PUT`).
pub fn verb_for_kind(kind: KeyKind) -> HttpVerb {
    match kind {
        KeyKind::Foreign | KeyKind::Temporary => HttpVerb::Post,
        KeyKind::Internal | KeyKind::Local => HttpVerb::Put,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_locality() {
        assert_eq!(verb_for_kind(KeyKind::Foreign), HttpVerb::Post);
        assert_eq!(verb_for_kind(KeyKind::Temporary), HttpVerb::Post);
        assert_eq!(verb_for_kind(KeyKind::Internal), HttpVerb::Put);
        assert_eq!(verb_for_kind(KeyKind::Local), HttpVerb::Put);
    }
}
