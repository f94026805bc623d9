//! # Issuance Cancellation
//!
//! The `cancel` endpoint abandons an issuance flow: the flow state is purged
//! and nothing else is touched.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Error;
use crate::holder::provider::{HolderProvider, StateStore};
use crate::Result;

/// A request to cancel an issuance flow.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct CancelRequest {
    /// The issuance flow identifier.
    pub issuance_id: String,
}

/// Cancel request handler.
///
/// # Errors
///
/// Returns `ServerError` if the flow state cannot be purged.
#[instrument(level = "debug", skip(provider))]
pub async fn cancel(provider: impl HolderProvider, request: CancelRequest) -> Result<()> {
    tracing::debug!("issuance::cancel");

    StateStore::purge(&provider, &request.issuance_id)
        .await
        .map_err(|e| Error::ServerError(format!("issue purging state: {e}")))
}
