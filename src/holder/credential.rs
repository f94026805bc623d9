//! # Credential
//!
//! The model of a credential owned by the wallet, plus the local management
//! endpoints. Listing and removal are pure local mutations with no network
//! effect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::Error;
use crate::holder::provider::{CredentialStorer, HolderProvider};
use crate::model::{CredentialSubject, VerifiableCredential};
use crate::Result;

/// A credential as stored by the wallet.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Credential {
    /// The credential's unique identifier (from the Verifiable Credential
    /// `id`, or generated if the credential has none).
    pub id: String,

    /// The credential issuer.
    pub issuer: String,

    /// The credential type(s). Used to determine whether a credential
    /// matches a presentation request.
    #[serde(rename = "type")]
    pub type_: Vec<String>,

    /// The claims asserted about the holder.
    pub subject_claims: CredentialSubject,

    /// The date the credential was issued.
    pub issuance_date: DateTime<Utc>,

    /// The date the credential expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,

    /// The Verifiable Credential as issued, for use in presentation
    /// submissions.
    pub vc: VerifiableCredential,
}

impl From<VerifiableCredential> for Credential {
    fn from(vc: VerifiableCredential) -> Self {
        let id = if vc.id.is_empty() {
            format!("urn:uuid:{}", Uuid::new_v4())
        } else {
            vc.id.clone()
        };
        Self {
            id,
            issuer: vc.issuer.clone(),
            type_: vc.type_.clone(),
            subject_claims: vc.credential_subject.clone(),
            issuance_date: vc.issuance_date,
            expiration_date: vc.expiration_date,
            vc,
        }
    }
}

/// A request to remove a stored credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RemoveRequest {
    /// The `id` of the credential to remove.
    pub credential_id: String,
}

/// List the holder's stored credentials, in storage order.
///
/// # Errors
///
/// Returns `ServerError` if the credential store fails.
#[instrument(level = "debug", skip(provider))]
pub async fn list(provider: impl HolderProvider) -> Result<Vec<Credential>> {
    tracing::debug!("credential::list");

    CredentialStorer::find(&provider, None)
        .await
        .map_err(|e| Error::ServerError(format!("issue listing credentials: {e}")))
}

/// Remove a stored credential by `id`.
///
/// # Errors
///
/// Returns `InvalidInput` if no stored credential matches the `id`.
#[instrument(level = "debug", skip(provider))]
pub async fn remove(provider: impl HolderProvider, request: RemoveRequest) -> Result<()> {
    tracing::debug!("credential::remove");

    if request.credential_id.is_empty() {
        return Err(Error::InvalidInput("no `credential_id` specified".into()));
    }
    CredentialStorer::remove(&provider, &request.credential_id)
        .await
        .map_err(|e| Error::InvalidInput(format!("issue removing credential: {e}")))
}
