//! Document retrieval resolver.
//!
//! Turns a stored document URL into the bytes of a forced download, no matter
//! which resource/delivery type assumptions were in effect at upload time.
//! The search space is the finite [`ProbePlan`] for the URL: every direct
//! candidate in priority order, then a prefix listing per type pair. Calls
//! are strictly sequential and the first success wins.

mod run;


use serde::Serialize;
use tracing::instrument;

use crate::config::DocfetchConfig;
use crate::error::ResolveError;
use crate::probe::{Candidate, ProbePlan};
use crate::provider::ProviderClient;
use crate::reference::DocumentRef;

/// Which phase produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Direct,
    Search,
}

/// A successfully resolved document, ready to be served as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub body: Vec<u8>,
    /// Upstream `content-type`, if any.
    pub content_type: Option<String>,
    /// Upstream `content-disposition`, or one synthesized from the resolved
    /// public id's final segment.
    pub content_disposition: String,
    pub candidate: Candidate,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    client: ProviderClient,
    host_suffix: String,
}

impl Resolver {
    pub fn new(client: ProviderClient, host_suffix: impl Into<String>) -> Self {
        Self {
            client,
            host_suffix: host_suffix.into(),
        }
    }

    /// Resolver over libcurl with the configured provider and host suffix.
    pub fn from_config(cfg: &DocfetchConfig) -> Self {
        Self::new(
            ProviderClient::with_curl(cfg.provider.clone()),
            cfg.host_suffix.clone(),
        )
    }

    pub fn host_suffix(&self) -> &str {
        &self.host_suffix
    }

    /// Validates `raw_url` and builds its probe plan without any provider call.
    pub fn plan(&self, raw_url: &str) -> Result<(DocumentRef, ProbePlan), ResolveError> {
        let doc = DocumentRef::from_url(raw_url, &self.host_suffix)?;
        let plan = ProbePlan::for_document(&doc);
        Ok((doc, plan))
    }

    /// Resolves and downloads the document behind `raw_url`.
    ///
    /// Blocks for as many provider round trips as it takes; run it on a
    /// blocking thread from async code.
    #[instrument(skip(self))]
    pub fn resolve(&self, raw_url: &str) -> Result<ResolvedDocument, ResolveError> {
        let (doc, plan) = match self.plan(raw_url) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("rejected input: {}", e);
                return Err(e);
            }
        };
        tracing::debug!(
            resource_type = %doc.resource_type,
            delivery_type = %doc.delivery_type,
            public_id = %doc.public_id,
            candidates = plan.direct.len(),
            "resolving document"
        );
        run::run_plan(&self.client, &plan)
    }
}
