//! # Issuance Save Endpoint
//!
//! Appends the buffered credential to the wallet's stored credentials and
//! ends the flow. This is the only step that touches credential storage, so
//! a failure anywhere earlier in the flow makes no partial mutation. Saving
//! deduplicates by credential `id`.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Issuance, Status};
use crate::error::Error;
use crate::holder::credential::Credential;
use crate::holder::provider::{CredentialStorer, HolderProvider, StateStore};
use crate::Result;

/// A request to save the credential received in an issuance flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct SaveRequest {
    /// The issuance flow identifier.
    pub issuance_id: String,
}

/// Save request handler.
///
/// # Errors
///
/// Returns `UnknownState` if no issuance flow matches the id and
/// `InvalidInput` if no credential has been received.
#[instrument(level = "debug", skip(provider))]
pub async fn save(provider: impl HolderProvider, request: SaveRequest) -> Result<Credential> {
    tracing::debug!("issuance::save");

    let issuance: Issuance = StateStore::get(&provider, &request.issuance_id)
        .await
        .map_err(|_| Error::UnknownState("issuance flow not found".into()))?;

    if issuance.status != Status::CredentialReceived {
        return Err(Error::InvalidInput("no credential on flow".into()));
    }
    let Some(credential) = issuance.issued else {
        return Err(Error::ServerError("credential not set".into()));
    };

    // overwrites any stored credential with the same id
    CredentialStorer::save(&provider, &credential)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving credential: {e}")))?;

    StateStore::purge(&provider, &request.issuance_id)
        .await
        .map_err(|e| Error::ServerError(format!("issue purging state: {e}")))?;

    Ok(credential)
}
