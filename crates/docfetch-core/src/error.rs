//! Error types shared by the resolver, provider client and HTTP endpoint.

use axum::http::StatusCode;
use thiserror::Error;

/// Message returned to callers when no provider message is available.
pub const GENERIC_FAILURE: &str = "Failed to download document";

/// Transport-level failure: the provider could not be reached or the
/// request could not be built. Never drives further probing.
#[derive(Debug, Error)]
pub enum TransportError {
    /// libcurl reported an error (connect refused, timeout, TLS, ...).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// Provider endpoint URL could not be built from configuration.
    #[error("invalid provider endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// Blocking worker running the probe loop did not complete.
    #[error("resolver task failed: {0}")]
    Task(String),
}

/// Error returned by [`crate::resolver::Resolver::resolve`].
///
/// The first four variants are input validation failures (HTTP 400, no
/// provider calls made); the rest are downstream failures (HTTP 500).
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Missing url parameter")]
    MissingUrl,
    #[error("Invalid url parameter")]
    InvalidUrl,
    #[error("Unsupported url host: {0}")]
    UnsupportedHost(String),
    #[error("Could not extract public id from url")]
    MissingPublicId,
    /// A non-not-found provider error during the search phase.
    #[error("provider error: {0}")]
    Provider(String),
    /// Every candidate was tried; carries the last recorded provider message.
    #[error("all candidates exhausted: {}", .0.as_deref().unwrap_or("no provider message"))]
    Exhausted(Option<String>),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ResolveError {
    /// True for malformed or invalid caller input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ResolveError::MissingUrl
                | ResolveError::InvalidUrl
                | ResolveError::UnsupportedHost(_)
                | ResolveError::MissingPublicId
        )
    }

    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Text placed in the `{ "error": ... }` body. Transport details stay in
    /// the logs.
    pub fn public_message(&self) -> String {
        match self {
            ResolveError::UnsupportedHost(_) => "Unsupported url host".to_string(),
            ResolveError::Provider(msg) => msg.clone(),
            ResolveError::Exhausted(Some(msg)) => msg.clone(),
            ResolveError::Exhausted(None) | ResolveError::Transport(_) => {
                GENERIC_FAILURE.to_string()
            }
            other => other.to_string(),
        }
    }
}
