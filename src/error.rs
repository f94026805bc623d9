//! # Errors
//!
//! Error types shared by the issuer, verifier, and holder endpoints. Errors
//! serialize to the `{"error": "...", "error_description": "..."}` form used
//! in OAuth-style error responses so they can be returned to a wallet or
//! verifier client without translation.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Result type for endpoint handlers.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors for credential issuance and presentation.
///
/// Every variant is recoverable at the caller: a failed operation never
/// partially applies to a state store, and the wallet reports the error and
/// returns to an idle state.
#[derive(Error, Debug, Deserialize)]
pub enum Error {
    /// The request is missing a required parameter, includes an unsupported
    /// parameter value, or is otherwise malformed.
    #[error(r#"{{"error": "invalid_input", "error_description": "{0}"}}"#)]
    InvalidInput(String),

    /// The pre-authorized code is absent, expired, or already redeemed.
    #[error(r#"{{"error": "unknown_code", "error_description": "{0}"}}"#)]
    UnknownCode(String),

    /// The access token is absent, expired, or already used for issuance.
    #[error(r#"{{"error": "unknown_token", "error_description": "{0}"}}"#)]
    UnknownToken(String),

    /// The presentation state key does not reference a pending session.
    #[error(r#"{{"error": "unknown_state", "error_description": "{0}"}}"#)]
    UnknownState(String),

    /// A proof failed verification or is structurally malformed.
    #[error(r#"{{"error": "invalid_proof", "error_description": "{0}"}}"#)]
    InvalidProof(String),

    /// The presentation's nonce does not match the nonce issued for the
    /// session.
    #[error(r#"{{"error": "nonce_mismatch", "error_description": "{0}"}}"#)]
    NonceMismatch(String),

    /// The presentation's audience does not match the verifier's client id.
    #[error(r#"{{"error": "audience_mismatch", "error_description": "{0}"}}"#)]
    AudienceMismatch(String),

    /// A requested credential type is not covered by any presented
    /// credential.
    #[error(r#"{{"error": "missing_credential_type", "error_description": "{0}"}}"#)]
    MissingCredentialType(String),

    /// No stored credential matches the verifier's requested types.
    #[error(r#"{{"error": "no_matching_credential", "error_description": "{0}"}}"#)]
    NoMatchingCredential(String),

    /// The presentation session has already completed; the stored result is
    /// unchanged.
    #[error(r#"{{"error": "session_already_completed", "error_description": "{0}"}}"#)]
    SessionAlreadyCompleted(String),

    /// A transport collaborator (issuer or verifier endpoint) could not be
    /// reached.
    #[error(r#"{{"error": "upstream_unavailable", "error_description": "{0}"}}"#)]
    UpstreamUnavailable(String),

    /// The server encountered an unexpected condition that prevented it from
    /// fulfilling the request.
    #[error(r#"{{"error": "server_error", "error_description": "{0}"}}"#)]
    ServerError(String),
}

impl Error {
    /// The error code, without the description.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnknownCode(_) => "unknown_code",
            Self::UnknownToken(_) => "unknown_token",
            Self::UnknownState(_) => "unknown_state",
            Self::InvalidProof(_) => "invalid_proof",
            Self::NonceMismatch(_) => "nonce_mismatch",
            Self::AudienceMismatch(_) => "audience_mismatch",
            Self::MissingCredentialType(_) => "missing_credential_type",
            Self::NoMatchingCredential(_) => "no_matching_credential",
            Self::SessionAlreadyCompleted(_) => "session_already_completed",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::ServerError(_) => "server_error",
        }
    }

    /// Transform the error to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.to_string()).unwrap_or_default()
    }
}

/// Error response body.
#[derive(Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Error description.
    pub error_description: String,
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error as SerdeError;

        let Ok(error) = serde_json::from_str::<ErrorResponse>(&self.to_string()) else {
            return Err(SerdeError::custom("issue serializing error"));
        };
        error.serialize(serializer)
    }
}
