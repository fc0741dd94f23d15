//! libcurl-backed [`Transport`].

use std::time::Duration;

use curl::easy::{Auth, Easy};

use super::headers::parse_header_lines;
use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::config::ProviderConfig;
use crate::error::TransportError;

/// Sends each request on a fresh `Easy` handle. Follows redirects; Basic
/// credentials are not forwarded to other hosts.
/// One raw header line. Non-UTF-8 bytes (e.g. a Latin-1 filename) are
/// replaced rather than dropping the whole line.
fn header_line(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &ProviderConfig) -> Self {
        Self::new(cfg.connect_timeout(), cfg.timeout())
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = Easy::new();
        easy.url(&request.url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        if let Some(creds) = &request.credentials {
            let mut auth = Auth::new();
            auth.basic(true);
            easy.http_auth(&auth)?;
            easy.username(&creds.username)?;
            easy.password(&creds.password)?;
        }

        match request.method {
            Method::Get => easy.get(true)?,
            Method::Post => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(request.form.iter())
                    .finish();
                easy.post(true)?;
                easy.post_fields_copy(encoded.as_bytes())?;
            }
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                header_lines.push(header_line(data));
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::trace!(url = %request.url, status, bytes = body.len(), "provider response");

        Ok(ApiResponse {
            status,
            headers: parse_header_lines(&header_lines),
            body,
        })
    }
}
