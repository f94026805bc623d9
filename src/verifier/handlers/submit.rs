//! # Submit Endpoint
//!
//! Verifies a presentation submitted against a pending session. The session
//! is single-use: whatever the outcome, it moves to `completed` and the
//! result is frozen — a second submission against the same `state` is
//! rejected without touching the recorded result.
//!
//! Verification checks, in order: the holder's proof over the envelope, the
//! nonce, the audience, each embedded credential proof, credential expiry,
//! and coverage of the requested types.

use chrono::Utc;
use tracing::instrument;

use crate::error::Error;
use crate::model::CredentialSubject;
use crate::verifier::provider::{Provider, StateStore};
use crate::verifier::state::{Expire, State, Status};
use crate::verifier::types::{SubmitRequest, VerificationResult};
use crate::{proof, Result};

/// Submit request handler.
///
/// # Errors
///
/// Returns `UnknownState` if the session is absent or expired,
/// `SessionAlreadyCompleted` if it has already been decided, and the
/// verification error (`InvalidProof`, `NonceMismatch`, `AudienceMismatch`,
/// `MissingCredentialType`, ...) when the presentation fails a check. A
/// failed check still completes the session, recording the error code.
#[instrument(level = "debug", skip(provider))]
pub async fn submit(
    provider: impl Provider, request: SubmitRequest,
) -> Result<VerificationResult> {
    let Ok(state) = StateStore::get::<State>(&provider, &request.state).await else {
        return Err(Error::UnknownState("presentation state is invalid".into()));
    };
    if matches!(state.status, Status::Completed(_)) {
        return Err(Error::SessionAlreadyCompleted("presentation already verified".into()));
    }
    if state.is_expired() {
        return Err(Error::UnknownState("presentation state is invalid".into()));
    }

    // consume the pending session: remove-and-return so two submissions
    // cannot both be verified
    let Ok(state) = StateStore::take::<State>(&provider, &request.state).await else {
        return Err(Error::UnknownState("presentation state is invalid".into()));
    };
    if matches!(state.status, Status::Completed(_)) {
        // lost the race to another submission: restore the decided session
        let expires_at = state.expires_at;
        let _ = StateStore::put(&provider, &request.state, &state, expires_at).await;
        return Err(Error::SessionAlreadyCompleted("presentation already verified".into()));
    }

    let ctx = Context { state };

    match ctx.verify(&provider, &request).await {
        Ok(shared_claims) => {
            let result = VerificationResult {
                valid: true,
                shared_claims: Some(shared_claims),
                error: None,
            };
            ctx.complete(&provider, &request.state, result.clone()).await?;
            Ok(result)
        }
        Err(e) => {
            let result = VerificationResult {
                valid: false,
                shared_claims: None,
                error: Some(e.code().to_string()),
            };
            ctx.complete(&provider, &request.state, result).await?;
            Err(e)
        }
    }
}

#[derive(Debug)]
struct Context {
    state: State,
}

impl Context {
    // Verify the envelope against the session's request, returning the
    // shared subject claims on success.
    async fn verify(
        &self, provider: &impl Provider, request: &SubmitRequest,
    ) -> Result<Vec<CredentialSubject>> {
        tracing::debug!("submit::verify");

        let envelope = &request.vp_token;
        let pres_req = &self.state.request;

        let Some(holder_proof) = &envelope.proof else {
            return Err(Error::InvalidProof("presentation has no proof".into()));
        };
        if !proof::verify(&envelope.unsigned(), holder_proof, provider).await {
            return Err(Error::InvalidProof("presentation proof is invalid".into()));
        }
        if envelope.nonce != pres_req.nonce {
            return Err(Error::NonceMismatch("nonce does not match request".into()));
        }
        if envelope.aud != pres_req.client_id {
            return Err(Error::AudienceMismatch("`aud` does not match verifier".into()));
        }

        for vc in &envelope.vp.verifiable_credential {
            let Some(vc_proof) = &vc.proof else {
                return Err(Error::InvalidProof(format!("credential {} has no proof", vc.id)));
            };
            if !proof::verify(&vc.unsigned(), vc_proof, provider).await {
                return Err(Error::InvalidProof(format!(
                    "credential {} proof is invalid",
                    vc.id
                )));
            }
            if vc.is_expired() {
                return Err(Error::InvalidInput(format!("credential {} has expired", vc.id)));
            }
        }

        // every requested type must be covered by a presented credential
        for requested in &pres_req.definition.requested_types {
            if !envelope.vp.verifiable_credential.iter().any(|vc| vc.has_type(requested)) {
                return Err(Error::MissingCredentialType(format!(
                    "no credential of type: {requested}"
                )));
            }
        }

        let shared = envelope
            .vp
            .verifiable_credential
            .iter()
            .map(|vc| vc.credential_subject.clone())
            .collect();
        Ok(shared)
    }

    // Freeze the session with its result.
    async fn complete(
        &self, provider: &impl Provider, key: &str, result: VerificationResult,
    ) -> Result<()> {
        tracing::debug!("submit::complete");

        let state = State {
            request: self.state.request.clone(),
            status: Status::Completed(result),
            expires_at: Utc::now() + Expire::Result.duration(),
        };
        StateStore::put(provider, key, &state, state.expires_at)
            .await
            .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))
    }
}
