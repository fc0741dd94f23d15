//! Classify provider failures: "not found" keeps the resolver probing,
//! anything else is a concrete API error.

use serde_json::Value;

use super::transport::ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider has nothing under this identifier combination.
    NotFound,
    /// Auth failure, rate limit, malformed request, server error, ...
    Other,
}

/// A non-success provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub kind: FailureKind,
    pub status: u32,
    pub message: String,
}

impl ProviderFailure {
    pub fn is_not_found(&self) -> bool {
        self.kind == FailureKind::NotFound
    }

    pub fn from_response(response: &ApiResponse) -> Self {
        let message = error_message(response).unwrap_or_else(|| format!("HTTP {}", response.status));
        Self {
            kind: classify(response.status, &message),
            status: response.status,
            message,
        }
    }
}

/// 404, or any message mentioning "not found", is `NotFound`.
pub fn classify(status: u32, message: &str) -> FailureKind {
    if status == 404 || message.to_ascii_lowercase().contains("not found") {
        FailureKind::NotFound
    } else {
        FailureKind::Other
    }
}

/// Provider's error message: JSON `{"error":{"message":..}}`,
/// `{"error":".."}` or `{"message":".."}`, then the `X-Cld-Error` header.
fn error_message(response: &ApiResponse) -> Option<String> {
    let from_body = serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("error").filter(|e| e.is_string()))
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });
    from_body
        .or_else(|| response.header("x-cld-error").map(str::to_string))
        .filter(|m| !m.trim().is_empty())
}
