//! # Metadata Endpoint
//!
//! Endpoint discovery: returns the issuer identifier, token and credential
//! endpoints, and the credential types the issuer can mint.

use tracing::instrument;

use crate::error::Error;
use crate::issuer::provider::{Metadata, Provider};
use crate::issuer::types::{MetadataRequest, MetadataResponse};
use crate::Result;

/// Metadata request handler.
///
/// # Errors
///
/// Returns `ServerError` if the provider's metadata is unavailable.
#[instrument(level = "debug", skip(provider))]
pub async fn metadata(
    provider: impl Provider, _request: MetadataRequest,
) -> Result<MetadataResponse> {
    tracing::debug!("metadata::process");

    let issuer = Metadata::issuer(&provider)
        .await
        .map_err(|e| Error::ServerError(format!("issue getting metadata: {e}")))?;

    Ok(MetadataResponse { issuer })
}
