//! # Presentation Authorization
//!
//! The `authorize` endpoint registers the holder's authorization of a
//! presentation — the explicit consent checkpoint before anything is sent to
//! the verifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Presentation, Status};
use crate::error::Error;
use crate::holder::provider::{HolderProvider, StateStore};
use crate::Result;

/// A request to authorize a presentation.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct AuthorizeRequest {
    /// The presentation flow identifier.
    pub presentation_id: String,
}

/// Authorize request handler.
///
/// # Errors
///
/// Returns `UnknownState` if no presentation flow matches the id and
/// `InvalidInput` if the flow is not awaiting the holder's decision.
#[instrument(level = "debug", skip(provider))]
pub async fn authorize(
    provider: impl HolderProvider, request: AuthorizeRequest,
) -> Result<Status> {
    tracing::debug!("presentation::authorize");

    let mut presentation: Presentation = StateStore::get(&provider, &request.presentation_id)
        .await
        .map_err(|_| Error::UnknownState("presentation flow not found".into()))?;

    if presentation.status != Status::Requested {
        return Err(Error::InvalidInput("flow is not awaiting authorization".into()));
    }
    presentation.status = Status::Authorized;

    StateStore::put(&provider, &presentation.id, &presentation, DateTime::<Utc>::MAX_UTC)
        .await
        .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

    Ok(presentation.status)
}
