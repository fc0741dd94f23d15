//! In-memory provider used by unit tests: answers download and listing
//! requests from a fixed set of stored objects and records every call.

use std::collections::HashMap;
use std::sync::Mutex;

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::config::ProviderConfig;
use crate::error::TransportError;
use crate::probe::Candidate;
use crate::reference::{DeliveryType, ResourceType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Download(Candidate),
    Search {
        resource_type: ResourceType,
        delivery_type: DeliveryType,
        prefix: String,
        max_results: Option<String>,
    },
}

struct StoredObject {
    resource_type: ResourceType,
    delivery_type: DeliveryType,
    public_id: String,
    body: Vec<u8>,
}

#[derive(Default)]
pub struct FakeProvider {
    objects: Vec<StoredObject>,
    download_errors: HashMap<(ResourceType, DeliveryType), (u32, String)>,
    search_errors: HashMap<(ResourceType, DeliveryType), (u32, String)>,
    upstream_disposition: Option<String>,
    unreachable: bool,
    requests: Mutex<Vec<ApiRequest>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> ProviderConfig {
        ProviderConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base_url: "https://api.fake.test".to_string(),
            ..ProviderConfig::default()
        }
    }

    pub fn with_object(
        mut self,
        resource_type: ResourceType,
        delivery_type: DeliveryType,
        public_id: &str,
        body: &[u8],
    ) -> Self {
        self.objects.push(StoredObject {
            resource_type,
            delivery_type,
            public_id: public_id.to_string(),
            body: body.to_vec(),
        });
        self
    }

    /// Download calls for this pair fail with `status` / `message`.
    pub fn with_download_error(
        mut self,
        resource_type: ResourceType,
        delivery_type: DeliveryType,
        status: u32,
        message: &str,
    ) -> Self {
        self.download_errors
            .insert((resource_type, delivery_type), (status, message.to_string()));
        self
    }

    /// Listing calls for this pair fail with `status` / `message`.
    pub fn with_search_error(
        mut self,
        resource_type: ResourceType,
        delivery_type: DeliveryType,
        status: u32,
        message: &str,
    ) -> Self {
        self.search_errors
            .insert((resource_type, delivery_type), (status, message.to_string()));
        self
    }

    pub fn with_upstream_disposition(mut self, value: &str) -> Self {
        self.upstream_disposition = Some(value.to_string());
        self
    }

    /// Every request fails at the transport level (connection refused).
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn download_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Download(_)))
            .count()
    }

    pub fn search_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Search { .. }))
            .count()
    }

    fn answer_download(&self, candidate: &Candidate) -> ApiResponse {
        let key = (candidate.resource_type, candidate.delivery_type);
        if let Some((status, message)) = self.download_errors.get(&key) {
            return json_error(*status, message);
        }
        let found = self.objects.iter().find(|o| {
            o.resource_type == candidate.resource_type
                && o.delivery_type == candidate.delivery_type
                && o.public_id == candidate.public_id
        });
        match found {
            Some(object) => {
                let mut headers = vec![(
                    "Content-Type".to_string(),
                    "application/octet-stream".to_string(),
                )];
                if let Some(cd) = &self.upstream_disposition {
                    headers.push(("Content-Disposition".to_string(), cd.clone()));
                }
                ApiResponse {
                    status: 200,
                    headers,
                    body: object.body.clone(),
                }
            }
            None => json_error(
                404,
                &format!("Resource not found - {}", candidate.public_id),
            ),
        }
    }

    fn answer_search(
        &self,
        resource_type: ResourceType,
        delivery_type: DeliveryType,
        prefix: &str,
    ) -> ApiResponse {
        if let Some((status, message)) = self.search_errors.get(&(resource_type, delivery_type)) {
            return json_error(*status, message);
        }
        let found = self.objects.iter().find(|o| {
            o.resource_type == resource_type
                && o.delivery_type == delivery_type
                && o.public_id.starts_with(prefix)
        });
        let resources = match found {
            Some(o) => serde_json::json!([{ "public_id": o.public_id }]),
            None => serde_json::json!([]),
        };
        ApiResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::json!({ "resources": resources }).to_string().into_bytes(),
        }
    }
}

fn json_error(status: u32, message: &str) -> ApiResponse {
    ApiResponse {
        status,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: serde_json::json!({ "error": { "message": message } })
            .to_string()
            .into_bytes(),
    }
}

impl Transport for FakeProvider {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.unreachable {
            // CURLE_COULDNT_CONNECT
            return Err(TransportError::Curl(curl::Error::new(7)));
        }

        let url = url::Url::parse(&request.url)?;
        let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();

        match (request.method, segments.as_slice()) {
            (Method::Post, ["v1_1", "demo", rt, "download"]) => {
                let candidate = Candidate {
                    resource_type: rt.parse().expect("resource type"),
                    delivery_type: request
                        .form_value("type")
                        .and_then(|t| t.parse().ok())
                        .expect("delivery type"),
                    public_id: request.form_value("public_id").unwrap_or_default().to_string(),
                };
                self.calls
                    .lock()
                    .unwrap()
                    .push(RecordedCall::Download(candidate.clone()));
                Ok(self.answer_download(&candidate))
            }
            (Method::Get, ["v1_1", "demo", "resources", rt, dt]) => {
                let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
                let resource_type: ResourceType = rt.parse().expect("resource type");
                let delivery_type: DeliveryType = dt.parse().expect("delivery type");
                let prefix = query.get("prefix").cloned().unwrap_or_default();
                self.calls.lock().unwrap().push(RecordedCall::Search {
                    resource_type,
                    delivery_type,
                    prefix: prefix.clone(),
                    max_results: query.get("max_results").cloned(),
                });
                Ok(self.answer_search(resource_type, delivery_type, &prefix))
            }
            _ => Ok(json_error(400, "unexpected request")),
        }
    }
}
