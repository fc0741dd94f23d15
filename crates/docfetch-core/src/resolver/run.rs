//! The two probe phases.

use crate::error::ResolveError;
use crate::filename::{attachment, basename};
use crate::probe::{Candidate, ProbePlan};
use crate::provider::{DownloadOutcome, ProviderClient, ProviderFailure, SearchOutcome};

use super::{Phase, ResolvedDocument};

/// Walks `plan` until a download succeeds.
///
/// Direct phase: every candidate is tried; any failure is recorded and the
/// walk goes on. Search phase: not-found (or an empty listing) moves to the
/// next pair, any other provider error ends resolution with that error.
/// Transport errors end resolution immediately in both phases.
pub(super) fn run_plan(
    client: &ProviderClient,
    plan: &ProbePlan,
) -> Result<ResolvedDocument, ResolveError> {
    let mut last_failure: Option<ProviderFailure> = None;

    for candidate in &plan.direct {
        match attempt(client, candidate, Phase::Direct)? {
            Ok(doc) => return Ok(doc),
            Err(failure) => last_failure = Some(failure),
        }
    }

    tracing::warn!(
        prefix = %plan.search_prefix,
        attempts = plan.direct.len(),
        "direct candidates exhausted, resolving by prefix listing"
    );

    for &(resource_type, delivery_type) in &plan.search {
        let public_id = match client.search(resource_type, delivery_type, &plan.search_prefix)? {
            SearchOutcome::Match(public_id) => public_id,
            SearchOutcome::NoMatch => continue,
            SearchOutcome::Failed(failure) if failure.is_not_found() => {
                last_failure = Some(failure);
                continue;
            }
            SearchOutcome::Failed(failure) => {
                tracing::warn!(
                    %resource_type,
                    %delivery_type,
                    status = failure.status,
                    "listing failed: {}",
                    failure.message
                );
                return Err(ResolveError::Provider(failure.message));
            }
        };

        let candidate = Candidate {
            resource_type,
            delivery_type,
            public_id,
        };
        match attempt(client, &candidate, Phase::Search)? {
            Ok(doc) => return Ok(doc),
            Err(failure) if failure.is_not_found() => last_failure = Some(failure),
            Err(failure) => return Err(ResolveError::Provider(failure.message)),
        }
    }

    let message = last_failure.map(|f| f.message);
    tracing::warn!(
        "document could not be resolved: {}",
        message.as_deref().unwrap_or("no provider message")
    );
    Err(ResolveError::Exhausted(message))
}

/// One forced download. Outer error: transport; inner error: provider said no.
fn attempt(
    client: &ProviderClient,
    candidate: &Candidate,
    phase: Phase,
) -> Result<Result<ResolvedDocument, ProviderFailure>, ResolveError> {
    tracing::debug!(
        resource_type = %candidate.resource_type,
        delivery_type = %candidate.delivery_type,
        public_id = %candidate.public_id,
        ?phase,
        "download attempt"
    );

    match client.download(candidate)? {
        DownloadOutcome::Found(doc) => {
            tracing::info!(
                candidate = %candidate,
                ?phase,
                bytes = doc.body.len(),
                "document resolved"
            );
            let content_disposition = doc
                .content_disposition
                .unwrap_or_else(|| attachment(basename(&candidate.public_id)));
            Ok(Ok(ResolvedDocument {
                body: doc.body,
                content_type: doc.content_type,
                content_disposition,
                candidate: candidate.clone(),
                phase,
            }))
        }
        DownloadOutcome::Failed(failure) => {
            tracing::debug!(
                status = failure.status,
                not_found = failure.is_not_found(),
                "download failed: {}",
                failure.message
            );
            Ok(Err(failure))
        }
    }
}
