//! Object storage provider access.
//!
//! Two read-side admin API actions are used: forced download of a
//! `(resource type, delivery type, public id)` combination, and a prefix
//! listing that recovers an exact public id. Calls go through the
//! [`Transport`] trait; [`CurlTransport`] is the production implementation.

mod classify;
mod client;
mod curl_transport;
mod headers;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{classify, FailureKind, ProviderFailure};
pub use client::{Document, DownloadOutcome, ProviderClient, SearchOutcome};
pub use curl_transport::CurlTransport;
pub use transport::{ApiRequest, ApiResponse, Credentials, Method, Transport};
