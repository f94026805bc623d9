//! # Issuance Token Endpoint
//!
//! Exchanges the offer's pre-authorized code for an access token via the
//! issuer client. A failed exchange aborts the whole flow — the flow state
//! is purged and the error surfaced, with no retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Issuance, Status};
use crate::error::Error;
use crate::holder::client_error;
use crate::holder::provider::{HolderProvider, IssuerClient, StateStore};
use crate::issuer;
use crate::issuer::types::GRANT_TYPE_PRE_AUTHORIZED;
use crate::Result;

/// A request to progress an accepted issuance flow to token exchange.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct TokenRequest {
    /// The issuance flow identifier.
    pub issuance_id: String,
}

/// Token request handler.
///
/// # Errors
///
/// Returns `UnknownState` if no issuance flow matches the id,
/// `InvalidInput` if the holder has not accepted the offer, and the issuer's
/// structured error (or `UpstreamUnavailable`) if the exchange fails.
#[instrument(level = "debug", skip(provider))]
pub async fn token(provider: impl HolderProvider, request: TokenRequest) -> Result<Issuance> {
    tracing::debug!("issuance::token");

    let mut issuance: Issuance = StateStore::get(&provider, &request.issuance_id)
        .await
        .map_err(|_| Error::UnknownState("issuance flow not found".into()))?;

    if issuance.status != Status::Accepted {
        return Err(Error::InvalidInput("holder has not accepted the offer".into()));
    }
    let Some(grant) = &issuance.offer.grants.pre_authorized_code else {
        return Err(Error::ServerError("pre-authorized code grant not set".into()));
    };

    let token_request = issuer::types::TokenRequest {
        grant_type: GRANT_TYPE_PRE_AUTHORIZED.into(),
        pre_authorized_code: grant.pre_authorized_code.clone(),
    };
    let response = match IssuerClient::token(&provider, &token_request).await {
        Ok(response) => response,
        Err(e) => {
            // a failure at any step aborts the whole flow
            let _ = StateStore::purge(&provider, &request.issuance_id).await;
            return Err(client_error(e));
        }
    };

    issuance.token = response;
    issuance.status = Status::TokenReceived;

    StateStore::put(&provider, &issuance.id, &issuance, DateTime::<Utc>::MAX_UTC)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

    Ok(issuance)
}
