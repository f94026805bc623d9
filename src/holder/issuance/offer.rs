//! # Issuance Offer Endpoint
//!
//! The offer endpoint starts an issuance flow from a received credential
//! offer — a plain JSON object or an encoded string, delivered over any side
//! channel. The offer is validated and stashed for the holder's review; no
//! network call is made until the holder accepts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::{Issuance, Status};
use crate::core::Kind;
use crate::error::Error;
use crate::holder::provider::{HolderProvider, StateStore};
use crate::issuer::types::CredentialOffer;
use crate::model::schema;
use crate::Result;

/// A request to start an issuance flow from a received offer.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct OfferRequest {
    /// The offer as received: a plain object or an encoded string.
    pub offer: Kind<CredentialOffer>,
}

/// Offer request handler.
///
/// # Errors
///
/// Returns `InvalidInput` if the offer cannot be parsed, carries no
/// pre-authorized code grant, or offers an unsupported credential type.
#[instrument(level = "debug", skip(provider))]
pub async fn offer(provider: impl HolderProvider, request: OfferRequest) -> Result<Issuance> {
    tracing::debug!("issuance::offer");

    let offer = match &request.offer {
        Kind::Object(offer) => offer.clone(),
        Kind::String(encoded) => encoded
            .parse::<CredentialOffer>()
            .map_err(|e| Error::InvalidInput(format!("issue parsing offer: {e}")))?,
    };

    verify(&offer)?;

    let issuance = Issuance {
        id: Uuid::new_v4().to_string(),
        status: Status::Offered,
        offer,
        ..Issuance::default()
    };

    // stash the flow state for the next step
    StateStore::put(&provider, &issuance.id, &issuance, DateTime::<Utc>::MAX_UTC)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

    Ok(issuance)
}

fn verify(offer: &CredentialOffer) -> Result<()> {
    tracing::debug!("issuance::offer::verify");

    if offer.credential_issuer.is_empty() {
        return Err(Error::InvalidInput("no `credential_issuer` on offer".into()));
    }
    let Some(grant) = &offer.grants.pre_authorized_code else {
        return Err(Error::InvalidInput("offer carries no pre-authorized code grant".into()));
    };
    if grant.pre_authorized_code.is_empty() {
        return Err(Error::InvalidInput("offer carries an empty pre-authorized code".into()));
    }
    if offer.credentials.is_empty() {
        return Err(Error::InvalidInput("no credentials on offer".into()));
    }
    for type_ in &offer.credentials {
        if schema::required_claims(type_).is_none() {
            return Err(Error::InvalidInput(format!("unsupported credential type: {type_}")));
        }
    }
    Ok(())
}
