//! Provider API client: the two read-side actions the resolver needs.

use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use super::classify::{FailureKind, ProviderFailure};
use super::curl_transport::CurlTransport;
use super::transport::{ApiRequest, ApiResponse, Credentials, Transport};
use crate::config::ProviderConfig;
use crate::error::TransportError;
use crate::probe::Candidate;
use crate::reference::{DeliveryType, ResourceType};

/// Bytes and content headers of a successful forced download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Found(Document),
    Failed(ProviderFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Exact public id of the first resource under the prefix.
    Match(String),
    NoMatch,
    Failed(ProviderFailure),
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    resources: Vec<ResourceEntry>,
}

#[derive(Debug, Deserialize)]
struct ResourceEntry {
    public_id: String,
}

/// Client for the provider's admin API. Cheap to clone.
#[derive(Clone)]
pub struct ProviderClient {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProviderClient {
    pub fn new(config: ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Client over [`CurlTransport`] with the configured timeouts.
    pub fn with_curl(config: ProviderConfig) -> Self {
        let transport = Arc::new(CurlTransport::from_config(&config));
        Self::new(config, transport)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn credentials(&self) -> Credentials {
        Credentials {
            username: self.config.api_key.clone(),
            password: self.config.api_secret.clone(),
        }
    }

    fn api_root(&self) -> String {
        format!(
            "{}/v1_1/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Forced download (`attachment=true`) of one candidate.
    #[instrument(skip(self, candidate), fields(candidate = %candidate))]
    pub fn download(&self, candidate: &Candidate) -> Result<DownloadOutcome, TransportError> {
        let url = format!("{}/{}/download", self.api_root(), candidate.resource_type);
        let form = vec![
            ("public_id".to_string(), candidate.public_id.clone()),
            ("attachment".to_string(), "true".to_string()),
            ("type".to_string(), candidate.delivery_type.to_string()),
        ];
        let request = ApiRequest::post_form(url, form).with_credentials(self.credentials());
        let response = self.transport.send(&request)?;

        if !response.is_success() {
            return Ok(DownloadOutcome::Failed(ProviderFailure::from_response(&response)));
        }
        let ApiResponse { headers, body, .. } = response;
        let header = |name: &str| {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        };
        Ok(DownloadOutcome::Found(Document {
            content_type: header("content-type"),
            content_disposition: header("content-disposition"),
            body,
        }))
    }

    /// Lists at most one resource whose public id starts with `prefix`.
    #[instrument(skip(self))]
    pub fn search(
        &self,
        resource_type: ResourceType,
        delivery_type: DeliveryType,
        prefix: &str,
    ) -> Result<SearchOutcome, TransportError> {
        let url = url::Url::parse_with_params(
            &format!("{}/resources/{}/{}", self.api_root(), resource_type, delivery_type),
            &[("prefix", prefix), ("max_results", "1")],
        )?;
        let request = ApiRequest::get(url.as_str()).with_credentials(self.credentials());
        let response = self.transport.send(&request)?;

        if !response.is_success() {
            return Ok(SearchOutcome::Failed(ProviderFailure::from_response(&response)));
        }
        match serde_json::from_slice::<ResourceList>(&response.body) {
            Ok(list) => Ok(list
                .resources
                .into_iter()
                .next()
                .map(|r| SearchOutcome::Match(r.public_id))
                .unwrap_or(SearchOutcome::NoMatch)),
            Err(e) => Ok(SearchOutcome::Failed(ProviderFailure {
                kind: FailureKind::Other,
                status: response.status,
                message: format!("malformed resource listing: {}", e),
            })),
        }
    }
}
