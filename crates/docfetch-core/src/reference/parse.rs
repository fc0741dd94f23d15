//! Input URL validation and path-pattern extraction.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::{DeliveryType, DocumentRef, ResourceType};
use crate::error::ResolveError;
use crate::filename::percent_decode;

/// `/<resource type>/<delivery type>/<rest>`
static TYPED_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(raw|image|video)/(upload|authenticated|private)/(.+)$")
        .expect("typed path pattern")
});

/// `/<resource type>/<rest>`; delivery type defaults to `upload`.
static LOOSE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(raw|image|video)/(.+)$").expect("loose path pattern"));

/// URL signature component of signed delivery URLs (`s--AbCdEfGh--/`).
static SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^s--[A-Za-z0-9_-]{8}--/").expect("signature pattern"));

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+/").expect("version pattern"));

/// Parses the caller-supplied URL. A value that only parses after one more
/// round of percent-decoding (double-encoded query parameter) is accepted.
pub fn parse_input_url(raw: &str) -> Result<Url, ResolveError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ResolveError::MissingUrl);
    }
    let url = Url::parse(raw)
        .or_else(|_| Url::parse(&percent_decode(raw)))
        .map_err(|_| ResolveError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ResolveError::InvalidUrl),
    }
}

/// True when `host` is `suffix` or a subdomain of it. Case-insensitive.
pub fn host_matches(host: &str, suffix: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let suffix = suffix.trim_start_matches('.').to_ascii_lowercase();
    if suffix.is_empty() {
        return false;
    }
    host == suffix || host.ends_with(&format!(".{}", suffix))
}

/// Extracts the triple from a URL path (still percent-encoded).
pub(super) fn extract(path: &str) -> Option<DocumentRef> {
    let (resource_type, delivery_type, rest) = if let Some(caps) = TYPED_PATH.captures(path) {
        (
            caps[1].parse::<ResourceType>().ok()?,
            caps[2].parse::<DeliveryType>().ok()?,
            caps.get(3)?.as_str(),
        )
    } else {
        let caps = LOOSE_PATH.captures(path)?;
        (
            caps[1].parse::<ResourceType>().ok()?,
            DeliveryType::Upload,
            caps.get(2)?.as_str(),
        )
    };

    // A trailing slash names a folder, not an object.
    let public_id = clean_identifier(rest);
    if public_id.is_empty() || public_id.ends_with('/') {
        return None;
    }
    Some(DocumentRef {
        resource_type,
        delivery_type,
        public_id: percent_decode(&public_id),
    })
}

fn clean_identifier(rest: &str) -> String {
    let rest = rest.trim_start_matches('/');
    let rest = SIGNATURE.replace(rest, "");
    let rest = rest.trim_start_matches('/');
    let rest = VERSION.replace(rest, "");
    rest.trim_start_matches('/').to_string()
}
