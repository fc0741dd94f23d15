//! Stored document references.
//!
//! A stored URL such as
//! `https://res.cloudinary.com/demo/raw/upload/v1700000000/docs/report.pdf`
//! is turned into a best-guess `(resource type, delivery type, public id)`
//! triple. The guess is only a starting point: the URL does not reliably say
//! which combination the document was uploaded under, so the resolver probes
//! around it.

mod forms;
mod kind;
mod parse;

pub use forms::{identifier_forms, strip_extension};
pub use kind::{DeliveryType, ResourceType, UnknownKind};
pub use parse::{host_matches, parse_input_url};

use crate::error::ResolveError;
use serde::Serialize;

/// Best-guess provider identifiers extracted from a stored document URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    pub resource_type: ResourceType,
    pub delivery_type: DeliveryType,
    /// Percent-decoded public id, version prefix removed.
    pub public_id: String,
}

impl DocumentRef {
    /// Validates `raw_url` against `host_suffix` and extracts the triple.
    ///
    /// Fails with a 400-class [`ResolveError`] when the URL does not parse,
    /// points at another host, or carries no identifier.
    pub fn from_url(raw_url: &str, host_suffix: &str) -> Result<Self, ResolveError> {
        let url = parse_input_url(raw_url)?;
        let host = url.host_str().unwrap_or_default();
        if !host_matches(host, host_suffix) {
            return Err(ResolveError::UnsupportedHost(host.to_string()));
        }
        parse::extract(url.path()).ok_or(ResolveError::MissingPublicId)
    }
}
