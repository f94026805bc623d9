//! # Present Endpoint
//!
//! Builds the Verifiable Presentation from the selected credential, wraps it
//! in an envelope binding the verifier's audience and nonce, signs the
//! envelope with the holder key, and submits it. The flow ends here whatever
//! the outcome; the raw verification result (or error) is surfaced to the
//! holder.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Presentation, Status};
use crate::error::Error;
use crate::holder::client_error;
use crate::holder::provider::{HolderProvider, Signer, StateStore, VerifierClient};
use crate::model::{VerifiablePresentation, VpEnvelope};
use crate::verifier::types::{SubmitRequest, VerificationResult};
use crate::{proof, Result};

/// A request to sign and submit an authorized presentation.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct PresentRequest {
    /// The presentation flow identifier.
    pub presentation_id: String,
}

/// Present request handler.
///
/// # Errors
///
/// Returns `UnknownState` if no presentation flow matches the id,
/// `InvalidInput` if the holder has not authorized the presentation, and
/// the verifier's structured error (or `UpstreamUnavailable`) if submission
/// fails.
#[instrument(level = "debug", skip(provider))]
pub async fn present(
    provider: impl HolderProvider, request: PresentRequest,
) -> Result<VerificationResult> {
    tracing::debug!("presentation::present");

    let presentation: Presentation = StateStore::get(&provider, &request.presentation_id)
        .await
        .map_err(|_| Error::UnknownState("presentation flow not found".into()))?;

    if presentation.status != Status::Authorized {
        return Err(Error::InvalidInput("holder has not authorized the presentation".into()));
    }
    let pres_req = &presentation.request;

    let vp = VerifiablePresentation::builder()
        .holder(Signer::verification_method(&provider))
        .add_credential(presentation.credential.vc.clone())
        .build()?;

    // the envelope binds the verifier's audience and nonce; the holder's
    // proof is computed with the proof field excluded
    let mut envelope = VpEnvelope {
        vp,
        aud: pres_req.client_id.clone(),
        nonce: pres_req.nonce.clone(),
        proof: None,
    };
    envelope.proof = Some(proof::create(&envelope.unsigned(), &provider).await?);

    let submit_request = SubmitRequest {
        vp_token: envelope,
        state: pres_req.state.clone(),
    };
    let result = match VerifierClient::submit(&provider, &submit_request).await {
        Ok(result) => result,
        Err(e) => {
            // the flow ends here whatever the outcome
            let _ = StateStore::purge(&provider, &request.presentation_id).await;
            return Err(client_error(e));
        }
    };

    StateStore::purge(&provider, &request.presentation_id)
        .await
        .map_err(|e| Error::ServerError(format!("issue purging state: {e}")))?;

    Ok(result)
}
