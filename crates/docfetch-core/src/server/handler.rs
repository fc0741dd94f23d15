use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, TransportError, GENERIC_FAILURE};
use crate::resolver::{ResolvedDocument, Resolver};

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    url: Option<String>,
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

pub async fn download_handler(
    State(resolver): State<Arc<Resolver>>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let raw = match params.url.filter(|u| !u.trim().is_empty()) {
        Some(raw) => raw,
        None => return error_response(&ResolveError::MissingUrl),
    };

    match tokio::task::spawn_blocking(move || resolver.resolve(&raw)).await {
        Ok(Ok(doc)) => document_response(doc),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            tracing::error!("resolver task failed: {}", e);
            error_response(&ResolveError::Transport(TransportError::Task(e.to_string())))
        }
    }
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub fn error_response(err: &ResolveError) -> Response {
    let status = err.status();
    if status.is_server_error() {
        tracing::warn!(%status, "download failed: {}", err);
    }
    (
        status,
        Json(ErrorBody {
            error: err.public_message(),
        }),
    )
        .into_response()
}

/// 200 with the document bytes and attachment headers.
pub fn document_response(doc: ResolvedDocument) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_DISPOSITION, doc.content_disposition.as_str())
        .header(CACHE_CONTROL, "private, no-store");
    if let Some(content_type) = &doc.content_type {
        builder = builder.header(CONTENT_TYPE, content_type.as_str());
    }
    match builder.body(Body::from(doc.body)) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("upstream headers not representable: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: GENERIC_FAILURE.to_string(),
                }),
            )
                .into_response()
        }
    }
}
