//! The serving store's view of resource-addressing URIs.
//!
//! [`Localhost`] is the capability the translation layer needs from its
//! host: knowing the store's own base URL, it can parse any well-formed
//! resource reference into a [`Key`] and classify a key's locality. The
//! provided [`ServerBase`] implementation resolves and validates the base
//! URL once at startup; nothing here reads process-wide state afterwards.

use url::Url;

use crate::key::{is_temporary_reference, Key, KeyKind};
use crate::{KeyError, KeyResult};

/// Capability trait: the identity space of the serving store.
///
/// Only [`base_url`](Localhost::base_url) is required; parsing and
/// classification are derived from it.
pub trait Localhost {
    /// The store's absolute base URL, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Whether `uri` addresses a resource inside this store.
    fn is_base_of(&self, uri: &str) -> bool {
        strip_base(uri, self.base_url()).is_some()
    }

    /// Parse a resource-addressing URI into a [`Key`].
    ///
    /// Accepted shapes:
    /// - absolute URLs under this store's base (yield a based key),
    /// - absolute URLs under any other base (yield a foreign key),
    /// - relative references `Type[/id[/_history/vid]]` (yield a base-less key),
    /// - `urn:uuid:` / `urn:oid:` placeholders (yield a temporary key).
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] for empty or malformed references.
    fn uri_to_key(&self, uri: &str) -> KeyResult<Key> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(KeyError::EmptyReference);
        }
        if is_temporary_reference(uri) {
            return Ok(Key::new(None, None, Some(uri.to_owned()), None));
        }
        if let Some(rest) = strip_base(uri, self.base_url()) {
            let key = parse_relative(rest)?;
            return Ok(key.with_base(self.base_url()));
        }
        if uri.contains("://") {
            return parse_foreign(uri);
        }
        parse_relative(uri.trim_start_matches('/'))
    }

    /// Classify a key's locality relative to this store.
    ///
    /// Pure function over the key value: never mutates and never fails.
    fn key_kind(&self, key: &Key) -> KeyKind {
        if key.is_temporary() {
            return KeyKind::Temporary;
        }
        match key.base() {
            None => KeyKind::Internal,
            Some(base) if bases_match(base, self.base_url()) => KeyKind::Local,
            Some(_) => KeyKind::Foreign,
        }
    }
}

/// The serving store's validated base URL.
///
/// Resolved once at startup and then passed into services, mirroring how
/// other runtime configuration is handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerBase {
    base: String,
}

impl ServerBase {
    /// Create a new `ServerBase` from an absolute `http`/`https` URL.
    ///
    /// The URL is normalised by trimming any trailing slash.
    ///
    /// # Errors
    ///
    /// Returns a `KeyError::InvalidInput` or `KeyError::InvalidBase` if the
    /// input is empty, not an absolute URL, uses a scheme other than
    /// http/https, or carries a query or fragment.
    pub fn new(base: impl AsRef<str>) -> KeyResult<Self> {
        let raw = base.as_ref().trim();
        if raw.is_empty() {
            return Err(KeyError::InvalidInput("base URL cannot be empty".into()));
        }

        let parsed = Url::parse(raw).map_err(|source| KeyError::InvalidBase {
            url: raw.to_owned(),
            source,
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(KeyError::InvalidInput(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(KeyError::InvalidInput("base URL must have a host".into()));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(KeyError::InvalidInput(
                "base URL must not carry a query or fragment".into(),
            ));
        }

        Ok(Self {
            base: raw.trim_end_matches('/').to_owned(),
        })
    }
}

impl Localhost for ServerBase {
    fn base_url(&self) -> &str {
        &self.base
    }
}

/// Compare two base URLs, insensitive to a trailing slash.
fn bases_match(left: &str, right: &str) -> bool {
    left.trim_end_matches('/') == right.trim_end_matches('/')
}

/// Strip `base` off the front of `uri`, requiring a segment boundary.
/// Returns the remainder without its leading slash; `Some("")` when the
/// URI is the base itself.
fn strip_base<'a>(uri: &'a str, base: &str) -> Option<&'a str> {
    let base = base.trim_end_matches('/');
    let rest = uri.strip_prefix(base)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix('/')
}

/// Parse a relative reference: `Type`, `Type/id` or `Type/id/_history/vid`.
fn parse_relative(path: &str) -> KeyResult<Key> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [] => Err(KeyError::EmptyReference),
        [type_name] => Ok(Key::new(None, Some((*type_name).to_owned()), None, None)),
        [type_name, id] => Ok(Key::new(
            None,
            Some((*type_name).to_owned()),
            Some((*id).to_owned()),
            None,
        )),
        [type_name, id, history, version] if *history == "_history" => Ok(Key::new(
            None,
            Some((*type_name).to_owned()),
            Some((*id).to_owned()),
            Some((*version).to_owned()),
        )),
        _ => Err(KeyError::MalformedReference(path.to_owned())),
    }
}

/// Parse an absolute reference rooted at some other store. The resource
/// part is recognised at the tail of the path; everything before it is the
/// foreign base.
fn parse_foreign(uri: &str) -> KeyResult<Key> {
    let parsed = Url::parse(uri).map_err(|_| KeyError::MalformedReference(uri.to_owned()))?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();
    if segments.is_empty() {
        return Err(KeyError::MalformedReference(uri.to_owned()));
    }

    let origin = parsed.origin().ascii_serialization();
    let (lead, type_name, id, version) = match segments.as_slice() {
        [lead @ .., type_name, id, history, version] if *history == "_history" => {
            (lead, *type_name, Some(*id), Some(*version))
        }
        [lead @ .., type_name, id] => (lead, *type_name, Some(*id), None),
        [type_name] => (&[][..], *type_name, None, None),
        [] => return Err(KeyError::MalformedReference(uri.to_owned())),
    };

    let base = if lead.is_empty() {
        origin
    } else {
        format!("{}/{}", origin, lead.join("/"))
    };

    Ok(Key::new(
        Some(base),
        Some(type_name.to_owned()),
        id.map(str::to_owned),
        version.map(str::to_owned),
    ))
}
