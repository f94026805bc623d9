//! # Issuance Credential Endpoint
//!
//! Requests the credential from the issuer. The wallet signs a proof of
//! possession over the issuer's audience and the token's `c_nonce` with the
//! holder key, then verifies the issuer's proof on the returned credential
//! before trusting it. The credential is buffered in flow state until the
//! holder saves it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Issuance, Status};
use crate::error::Error;
use crate::holder::client_error;
use crate::holder::credential::Credential;
use crate::holder::provider::{HolderProvider, IssuerClient, StateStore};
use crate::issuer;
use crate::issuer::types::{PopClaims, ProofOfPossession, FORMAT_VC_JSON};
use crate::{proof, Result};

/// A request to progress an issuance flow to credential retrieval.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct CredentialRequest {
    /// The issuance flow identifier.
    pub issuance_id: String,
}

/// Credential request handler.
///
/// # Errors
///
/// Returns `UnknownState` if no issuance flow matches the id,
/// `InvalidInput` if no token has been received, `InvalidProof` if the
/// issuer's proof on the returned credential does not verify, and the
/// issuer's structured error (or `UpstreamUnavailable`) if the request
/// fails.
#[instrument(level = "debug", skip(provider))]
pub async fn credential(
    provider: impl HolderProvider, request: CredentialRequest,
) -> Result<Issuance> {
    tracing::debug!("issuance::credential");

    let mut issuance: Issuance = StateStore::get(&provider, &request.issuance_id)
        .await
        .map_err(|_| Error::UnknownState("issuance flow not found".into()))?;

    if issuance.status != Status::TokenReceived {
        return Err(Error::InvalidInput("no access token on flow".into()));
    }

    // proof of possession: holder signature over the issuer's audience and
    // the token's nonce
    let claims = PopClaims {
        aud: issuance.offer.credential_issuer.clone(),
        nonce: issuance.token.c_nonce.clone(),
    };
    let pop_proof = proof::create(&claims, &provider).await?;

    let credential_request = issuer::types::CredentialRequest {
        access_token: issuance.token.access_token.clone(),
        format: FORMAT_VC_JSON.into(),
        proof: ProofOfPossession {
            claims,
            proof: pop_proof,
        },
    };
    let response = match IssuerClient::credential(&provider, &credential_request).await {
        Ok(response) => response,
        Err(e) => {
            let _ = StateStore::purge(&provider, &request.issuance_id).await;
            return Err(client_error(e));
        }
    };

    // check the issuer's proof before trusting the credential
    let vc = response.credential;
    let verified = match &vc.proof {
        Some(vc_proof) => proof::verify(&vc.unsigned(), vc_proof, &provider).await,
        None => false,
    };
    if !verified {
        let _ = StateStore::purge(&provider, &request.issuance_id).await;
        return Err(Error::InvalidProof("issued credential proof is invalid".into()));
    }

    issuance.issued = Some(Credential::from(vc));
    issuance.status = Status::CredentialReceived;

    StateStore::put(&provider, &issuance.id, &issuance, DateTime::<Utc>::MAX_UTC)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

    Ok(issuance)
}
