//! # Create Offer Endpoint
//!
//! Creates a Credential Offer for a subject. The offer carries a single-use
//! pre-authorized code the wallet exchanges for an access token. Offer data
//! is stored keyed by the code; nothing is stored if validation fails.

use chrono::Utc;
use tracing::instrument;

use crate::core::generate;
use crate::error::Error;
use crate::issuer::provider::{Metadata, Provider, StateStore};
use crate::issuer::state::{Expire, Offer, Stage, State};
use crate::issuer::types::{
    CreateOfferRequest, CreateOfferResponse, CredentialOffer, Grants, PreAuthorizedCodeGrant,
};
use crate::model::schema;
use crate::Result;

/// Create Offer request handler.
///
/// # Errors
///
/// Returns `InvalidInput` if the credential type is unsupported or a
/// required claim is missing.
#[instrument(level = "debug", skip(provider))]
pub async fn create_offer(
    provider: impl Provider, request: CreateOfferRequest,
) -> Result<CreateOfferResponse> {
    verify(&request)?;
    process(provider, request).await
}

fn verify(request: &CreateOfferRequest) -> Result<()> {
    tracing::debug!("create_offer::verify");

    if request.subject_id.is_empty() {
        return Err(Error::InvalidInput("no `subject_id` specified".into()));
    }
    schema::verify_claims(&request.credential_type, &request.credential_fields)
}

async fn process(
    provider: impl Provider, request: CreateOfferRequest,
) -> Result<CreateOfferResponse> {
    tracing::debug!("create_offer::process");

    let issuer = Metadata::issuer(&provider)
        .await
        .map_err(|e| Error::ServerError(format!("issue getting metadata: {e}")))?;

    let pre_auth_code = generate::pre_auth_code();

    // save offer data, keyed by the single-use code
    let state = State {
        subject_id: request.subject_id,
        stage: Stage::Offered(Offer {
            credential_type: request.credential_type.clone(),
            claims: request.credential_fields,
        }),
        expires_at: Utc::now() + Expire::Offer.duration(),
    };
    StateStore::put(&provider, &pre_auth_code, &state, state.expires_at)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

    let offer = CredentialOffer {
        credential_issuer: issuer.credential_issuer,
        credentials: vec![request.credential_type],
        grants: Grants {
            pre_authorized_code: Some(PreAuthorizedCodeGrant {
                pre_authorized_code: pre_auth_code,
            }),
        },
    };

    Ok(CreateOfferResponse { offer })
}
