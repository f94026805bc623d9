//! # Presentation Request Endpoint
//!
//! Starts a presentation flow from a received presentation request — a plain
//! JSON object or an encoded string, delivered over any side channel. The
//! first stored credential (storage order) whose types intersect the
//! requested types is selected; if none matches, the flow fails with
//! `NoMatchingCredential` and nothing is sent to the verifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::{Presentation, Status};
use crate::core::Kind;
use crate::error::Error;
use crate::holder::provider::{CredentialStorer, HolderProvider, StateStore};
use crate::verifier::types::PresentationRequest;
use crate::Result;

/// A received presentation request, as delivered to the wallet.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RequestReceived {
    /// The request as received: a plain object or an encoded string.
    pub request: Kind<PresentationRequest>,
}

/// Request handler: starts the presentation flow.
///
/// # Errors
///
/// Returns `InvalidInput` if the request cannot be parsed or has expired,
/// and `NoMatchingCredential` if no stored credential carries any of the
/// requested types.
#[instrument(level = "debug", skip(provider))]
pub async fn request(
    provider: impl HolderProvider, request: RequestReceived,
) -> Result<Presentation> {
    tracing::debug!("presentation::request");

    let pres_req = match &request.request {
        Kind::Object(req) => req.clone(),
        Kind::String(encoded) => encoded
            .parse::<PresentationRequest>()
            .map_err(|e| Error::InvalidInput(format!("issue parsing request: {e}")))?,
    };

    verify(&pres_req)?;

    // first stored credential whose types intersect the requested types
    let matching = CredentialStorer::find(
        &provider,
        Some(pres_req.definition.requested_types.clone()),
    )
    .await
    .map_err(|e| Error::ServerError(format!("issue querying credentials: {e}")))?;
    let Some(credential) = matching.into_iter().next() else {
        return Err(Error::NoMatchingCredential(
            "no stored credential matches the requested types".into(),
        ));
    };

    let presentation = Presentation {
        id: Uuid::new_v4().to_string(),
        status: Status::Requested,
        request: pres_req,
        credential,
    };

    // stash the flow state for the next step
    StateStore::put(&provider, &presentation.id, &presentation, DateTime::<Utc>::MAX_UTC)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

    Ok(presentation)
}

fn verify(pres_req: &PresentationRequest) -> Result<()> {
    tracing::debug!("presentation::request::verify");

    if pres_req.client_id.is_empty() {
        return Err(Error::InvalidInput("no `client_id` on request".into()));
    }
    if pres_req.state.is_empty() || pres_req.nonce.is_empty() {
        return Err(Error::InvalidInput("request is missing `state` or `nonce`".into()));
    }
    if pres_req.definition.requested_types.is_empty() {
        return Err(Error::InvalidInput("no credential types requested".into()));
    }
    if pres_req.expires_at < Utc::now() {
        return Err(Error::InvalidInput("presentation request has expired".into()));
    }
    Ok(())
}
