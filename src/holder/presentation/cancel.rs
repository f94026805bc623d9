//! # Presentation Cancellation
//!
//! The `cancel` endpoint abandons a presentation flow: the flow state is
//! purged and nothing is sent to the verifier, whose session stays pending.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Error;
use crate::holder::provider::{HolderProvider, StateStore};
use crate::Result;

/// A request to cancel a presentation flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct CancelRequest {
    /// The presentation flow identifier.
    pub presentation_id: String,
}

/// Cancel request handler.
///
/// # Errors
///
/// Returns `ServerError` if the flow state cannot be purged.
#[instrument(level = "debug", skip(provider))]
pub async fn cancel(provider: impl HolderProvider, request: CancelRequest) -> Result<()> {
    tracing::debug!("presentation::cancel");

    StateStore::purge(&provider, &request.presentation_id)
        .await
        .map_err(|e| Error::ServerError(format!("issue purging state: {e}")))
}
