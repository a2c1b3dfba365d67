//! Translation between interactions and bundle entries.
//!
//! Two directions:
//! - *Inbound*: a wire entry becomes an [`Interaction`] by extracting a
//!   key, extrapolating a verb and carrying the payload along. This is
//!   total: absent keys and absent payloads are valid, and unparseable
//!   request URLs are tolerated (logged and treated as absent).
//! - *Outbound*: an interaction becomes either a *sparse* entry (payload
//!   only) or a *transaction* entry (request sub-structure populated),
//!   chosen per bundle shape by [`append`].

use crx_keys::{Key, Localhost};
use crx_model::{Bundle, BundleEntry, BundleType, EntryRequest, HttpVerb};

use crate::interaction::Interaction;
use crate::verb::verb_for_kind;

/// Inbound translator: turns wire entries into interactions using the
/// serving store's identity space.
///
/// The verb used for entries with no resolvable key is configurable; it
/// defaults to `DELETE`, the only verb for which both a missing payload
/// and a missing request URL are plausible.
#[derive(Clone, Debug)]
pub struct Translator<L: Localhost> {
    localhost: L,
    missing_key_verb: HttpVerb,
}

impl<L: Localhost> Translator<L> {
    pub fn new(localhost: L) -> Self {
        Self {
            localhost,
            missing_key_verb: HttpVerb::Delete,
        }
    }

    /// Override the fallback verb used when an entry yields no key.
    pub fn with_missing_key_verb(mut self, verb: HttpVerb) -> Self {
        self.missing_key_verb = verb;
        self
    }

    pub fn localhost(&self) -> &L {
        &self.localhost
    }

    /// Extract the identity of a wire entry.
    ///
    /// Precedence: a request URL is parsed host-locally; failing that the
    /// payload's self-identity is used; an entry with neither has no key,
    /// which is a valid state, not an error. An unparseable request URL
    /// is tolerated and treated as absent.
    pub fn extract_key(&self, entry: &BundleEntry) -> Option<Key> {
        if let Some(url) = entry.request.as_ref().and_then(|r| r.url.as_deref()) {
            match self.localhost.uri_to_key(url) {
                Ok(key) => Some(key),
                Err(err) => {
                    tracing::warn!("failed to parse request url '{}': {}", url, err);
                    None
                }
            }
        } else {
            entry.resource.as_ref().map(|r| r.extract_key())
        }
    }

    /// The verb for a wire entry: an explicit wire verb wins; otherwise
    /// the key's locality decides; a keyless entry takes the configured
    /// fallback.
    fn extrapolate_verb(&self, entry: &BundleEntry, key: Option<&Key>) -> HttpVerb {
        if let Some(method) = entry.request.as_ref().and_then(|r| r.method) {
            return method;
        }
        match key {
            Some(key) => verb_for_kind(self.localhost.key_kind(key)),
            None => self.missing_key_verb,
        }
    }

    /// Turn a wire entry into an interaction. Pure and total: absent key
    /// and absent payload are both valid.
    pub fn to_interaction(&self, entry: &BundleEntry) -> Interaction {
        let key = self.extract_key(entry);
        let method = self.extrapolate_verb(entry, key.as_ref());
        Interaction::new(method, key, entry.resource.clone())
    }

    /// Turn a whole bundle into interactions, stamping each base-less key
    /// with the bundle's base so identities stay resolvable once lifted
    /// out of the container.
    pub fn to_interactions(&self, bundle: &Bundle) -> Vec<Interaction> {
        bundle
            .entries
            .iter()
            .map(|entry| {
                let interaction = self.to_interaction(entry);
                match bundle.base.as_deref() {
                    Some(base) => interaction.supplement_base(base),
                    None => interaction,
                }
            })
            .collect()
    }
}

impl Interaction {
    /// Outbound translation to a *sparse* entry: no request sub-structure.
    /// A payload, when present, is attached with the key's identity
    /// stamped onto it.
    pub fn to_sparse_entry(&self) -> BundleEntry {
        let mut entry = BundleEntry::default();
        if let Some(resource) = self.resource() {
            let mut resource = resource.clone();
            if let Some(key) = self.key() {
                resource.apply_key(key);
            }
            entry.resource = Some(resource);
        }
        entry
    }

    /// Outbound translation to a *transaction* entry: the request
    /// sub-structure is always populated with the verb and, when a key
    /// exists, its canonical URI. The payload is attached and stamped as
    /// in the sparse case.
    pub fn to_transaction_entry(&self) -> BundleEntry {
        let mut entry = self.to_sparse_entry();
        entry.request = Some(EntryRequest {
            method: Some(self.method()),
            url: self.key().map(Key::to_uri),
        });
        entry
    }
}

/// Append one interaction to a bundle, translated per the bundle's shape.
///
/// History and transaction shapes require populated request
/// sub-structures; every other shape takes sparse entries. The match is
/// exhaustive, so a new bundle shape is a compile-time decision here, not
/// a silent fallthrough.
pub fn append(bundle: &mut Bundle, interaction: &Interaction) {
    let entry = match bundle.bundle_type {
        BundleType::History | BundleType::Transaction | BundleType::TransactionResponse => {
            interaction.to_transaction_entry()
        }
        BundleType::Document
        | BundleType::Message
        | BundleType::Batch
        | BundleType::BatchResponse
        | BundleType::Searchset
        | BundleType::Collection => interaction.to_sparse_entry(),
    };
    bundle.entries.push(entry);
}

/// Append a sequence of interactions in order.
///
/// The bundle's `total` is left alone: it describes the snapshot the
/// bundle was cut from, not the number of entries carried.
pub fn append_all<'a>(bundle: &mut Bundle, interactions: impl IntoIterator<Item = &'a Interaction>) {
    for interaction in interactions {
        append(bundle, interaction);
    }
}

/// Wholesale, order-preserving overwrite of a bundle's entry sequence
/// using the sparse translation uniformly. Existing entries are
/// discarded, not merged.
pub fn replace(bundle: &mut Bundle, interactions: &[Interaction]) {
    bundle.entries = interactions
        .iter()
        .map(Interaction::to_sparse_entry)
        .collect();
}
