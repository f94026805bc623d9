//! # Issuance Offer Acceptance
//!
//! The `accept` endpoint registers the holder's acceptance of a credential
//! offer — the explicit consent checkpoint before the wallet makes any
//! network call to the issuer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Issuance, Status};
use crate::error::Error;
use crate::holder::provider::{HolderProvider, StateStore};
use crate::Result;

/// A request to accept a credential offer.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct AcceptRequest {
    /// The issuance flow identifier.
    pub issuance_id: String,
}

/// Accept request handler.
///
/// # Errors
///
/// Returns `UnknownState` if no issuance flow matches the id and
/// `InvalidInput` if the flow is not awaiting the holder's decision.
#[instrument(level = "debug", skip(provider))]
pub async fn accept(provider: impl HolderProvider, request: AcceptRequest) -> Result<Status> {
    tracing::debug!("issuance::accept");

    let mut issuance: Issuance = StateStore::get(&provider, &request.issuance_id)
        .await
        .map_err(|_| Error::UnknownState("issuance flow not found".into()))?;

    if issuance.status != Status::Offered {
        return Err(Error::InvalidInput("flow is not awaiting acceptance".into()));
    }
    issuance.status = Status::Accepted;

    StateStore::put(&provider, &issuance.id, &issuance, DateTime::<Utc>::MAX_UTC)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

    Ok(issuance.status)
}
