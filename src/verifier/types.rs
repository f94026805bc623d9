//! Request and response types for the presentation endpoints.

use std::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CredentialSubject, VpEnvelope};

/// A Presentation Definition: the verifier's declaration of which credential
/// type(s) it will accept.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PresentationDefinition {
    /// Unique identifier for the definition.
    pub id: String,

    /// The credential types the verifier will accept. Every requested type
    /// must be covered by at least one presented credential.
    pub requested_types: Vec<String>,
}

/// A Presentation Request, created per verification attempt and delivered to
/// the wallet over a side channel. Single-use: the `state` value is consumed
/// on first matching submission.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PresentationRequest {
    /// What the verifier will accept.
    pub definition: PresentationDefinition,

    /// The verifier's client id — the audience the presentation must be
    /// addressed to.
    pub client_id: String,

    /// Where the wallet submits the presentation.
    pub response_uri: String,

    /// Per-request random value preventing replay of a captured
    /// presentation.
    pub nonce: String,

    /// Keys the verifier-side session for this attempt.
    pub state: String,

    /// When the request (and its session) expires.
    pub expires_at: DateTime<Utc>,
}

impl FromStr for PresentationRequest {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self, Self::Err> {
        if !s.starts_with('{') {
            // base64 encoded string
            let dec = Base64UrlUnpadded::decode_vec(s)?;
            return Ok(serde_json::from_slice(dec.as_slice())?);
        }
        Ok(serde_json::from_str(s)?)
    }
}

/// A request to create a Presentation Request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateRequestRequest {
    /// The credential types to request.
    pub requested_types: Vec<String>,
}

/// The response to a Create Request request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateRequestResponse {
    /// The request to deliver to the wallet.
    pub request: PresentationRequest,
}

/// A presentation submission from a wallet.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SubmitRequest {
    /// The signed presentation envelope.
    pub vp_token: VpEnvelope,

    /// The session state key from the presentation request.
    pub state: String,
}

/// The outcome of verifying a presentation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct VerificationResult {
    /// Whether the presentation verified.
    pub valid: bool,

    /// The subject claims shared by the presented credentials, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_claims: Option<Vec<CredentialSubject>>,

    /// The error code recorded when verification failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A request for the status of a verification session.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct StatusRequest {
    /// The session state key.
    pub state: String,
}

/// The status of a verification session.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusResponse {
    /// The session is awaiting a submission.
    Pending,

    /// The session has completed; the result is frozen.
    Completed {
        /// The recorded verification result.
        result: VerificationResult,
    },
}
