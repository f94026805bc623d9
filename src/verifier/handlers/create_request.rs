//! # Create Request Endpoint
//!
//! Creates a Presentation Request for one or more credential types. Each
//! request carries a fresh nonce and a `state` value keying a single-use
//! verification session. The request itself is delivered to the wallet over
//! a side channel (QR code, deep link).

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::core::generate;
use crate::error::Error;
use crate::model::schema;
use crate::verifier::provider::{Metadata, Provider, StateStore};
use crate::verifier::state::{Expire, State, Status};
use crate::verifier::types::{
    CreateRequestRequest, CreateRequestResponse, PresentationDefinition, PresentationRequest,
};
use crate::Result;

/// Create Request handler.
///
/// # Errors
///
/// Returns `InvalidInput` if no credential types are requested or a
/// requested type is unsupported.
#[instrument(level = "debug", skip(provider))]
pub async fn create_request(
    provider: impl Provider, request: CreateRequestRequest,
) -> Result<CreateRequestResponse> {
    verify(&request)?;
    process(provider, request).await
}

fn verify(request: &CreateRequestRequest) -> Result<()> {
    tracing::debug!("create_request::verify");

    if request.requested_types.is_empty() {
        return Err(Error::InvalidInput("no credential types requested".into()));
    }
    for type_ in &request.requested_types {
        if schema::required_claims(type_).is_none() {
            return Err(Error::InvalidInput(format!("unsupported credential type: {type_}")));
        }
    }
    Ok(())
}

async fn process(
    provider: impl Provider, request: CreateRequestRequest,
) -> Result<CreateRequestResponse> {
    tracing::debug!("create_request::process");

    let verifier = Metadata::verifier(&provider)
        .await
        .map_err(|e| Error::ServerError(format!("issue getting metadata: {e}")))?;

    let pres_req = PresentationRequest {
        definition: PresentationDefinition {
            id: Uuid::new_v4().to_string(),
            requested_types: request.requested_types,
        },
        client_id: verifier.client_id,
        response_uri: verifier.response_uri,
        nonce: generate::nonce(),
        state: generate::state_key(),
        expires_at: Utc::now() + Expire::Request.duration(),
    };

    // session starts pending, keyed by the request's state value
    let state = State {
        request: pres_req.clone(),
        status: Status::Pending,
        expires_at: pres_req.expires_at,
    };
    StateStore::put(&provider, &pres_req.state, &state, state.expires_at)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

    Ok(CreateRequestResponse { request: pres_req })
}
