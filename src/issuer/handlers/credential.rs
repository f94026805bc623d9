//! # Credential Endpoint
//!
//! Issues a credential in exchange for an access token and a valid proof of
//! possession. Issuance is exactly-once per token: the token state (and with
//! it the originating offer data) is atomically consumed on success. An
//! invalid proof of possession leaves the token intact so the wallet can
//! retry with a fresh proof.

use serde_json::Map;
use tracing::instrument;

use crate::error::Error;
use crate::issuer::provider::{Metadata, Provider, StateStore};
use crate::issuer::state::{Stage, State, Token};
use crate::issuer::types::{
    CredentialRequest, CredentialResponse, IssuerMetadata, FORMAT_VC_JSON,
};
use crate::model::{schema, CredentialSubject, VerifiableCredential};
use crate::{proof, Result};

/// Credential request handler.
///
/// # Errors
///
/// Returns `UnknownToken` if the access token is absent, expired, or
/// already used, and `InvalidProof` if the proof of possession does not
/// verify against the token's nonce and this issuer.
#[instrument(level = "debug", skip(provider))]
pub async fn credential(
    provider: impl Provider, request: CredentialRequest,
) -> Result<CredentialResponse> {
    let Ok(state) = StateStore::get::<State>(&provider, &request.access_token).await else {
        return Err(Error::UnknownToken("access token is invalid".into()));
    };

    let issuer = Metadata::issuer(&provider)
        .await
        .map_err(|e| Error::ServerError(format!("issue getting metadata: {e}")))?;

    let ctx = Context { state, issuer };

    ctx.verify(&provider, &request).await?;
    ctx.process(&provider, request).await
}

#[derive(Debug)]
struct Context {
    state: State,
    issuer: IssuerMetadata,
}

impl Context {
    // Verify the credential request and its proof of possession.
    async fn verify(&self, provider: &impl Provider, request: &CredentialRequest) -> Result<()> {
        tracing::debug!("credential::verify");

        if self.state.is_expired() {
            return Err(Error::UnknownToken("access token is invalid".into()));
        }
        let Stage::Validated(token) = &self.state.stage else {
            return Err(Error::ServerError("token state not set".into()));
        };

        if request.format != FORMAT_VC_JSON {
            return Err(Error::InvalidInput(format!(
                "unsupported credential format: {}",
                request.format
            )));
        }

        // proof of possession binds the request to this issuer and the
        // token's nonce
        let pop = &request.proof;
        if pop.claims.aud != self.issuer.credential_issuer {
            return Err(Error::InvalidProof("proof `aud` does not match issuer".into()));
        }
        if pop.claims.nonce != token.c_nonce {
            return Err(Error::InvalidProof("proof `nonce` does not match `c_nonce`".into()));
        }
        if !proof::verify(&pop.claims, &pop.proof, provider).await {
            return Err(Error::InvalidProof("proof of possession is invalid".into()));
        }

        Ok(())
    }

    // Issue the credential, consuming the access token.
    async fn process(
        &self, provider: &impl Provider, request: CredentialRequest,
    ) -> Result<CredentialResponse> {
        tracing::debug!("credential::process");

        // consume the token: remove-and-return so issuance is exactly-once
        let Ok(state) = StateStore::take::<State>(provider, &request.access_token).await else {
            return Err(Error::UnknownToken("access token is invalid".into()));
        };
        let Stage::Validated(token) = state.stage else {
            return Err(Error::ServerError("token state not set".into()));
        };

        let vc = self.build_credential(provider, &state.subject_id, &token).await?;

        Ok(CredentialResponse {
            format: FORMAT_VC_JSON.into(),
            credential: vc,
        })
    }

    // Build and sign the credential from the per-type schema and stored
    // offer data.
    async fn build_credential(
        &self, provider: &impl Provider, subject_id: &str, token: &Token,
    ) -> Result<VerifiableCredential> {
        let offer = &token.offer;
        let Some(required) = schema::required_claims(&offer.credential_type) else {
            return Err(Error::ServerError(format!(
                "no claim schema for type: {}",
                offer.credential_type
            )));
        };

        // shape credentialSubject in schema order
        let mut claims = Map::new();
        for key in required {
            let Some(value) = offer.claims.get(*key) else {
                return Err(Error::ServerError(format!("missing stored claim: {key}")));
            };
            claims.insert((*key).to_string(), value.clone());
        }

        let mut vc = VerifiableCredential::builder()
            .add_type(offer.credential_type.clone())
            .issuer(self.issuer.credential_issuer.clone())
            .subject(CredentialSubject {
                id: Some(subject_id.to_string()),
                claims,
            })
            .build()?;

        // proof is computed over the credential with `proof` excluded
        vc.proof = Some(proof::create(&vc.unsigned(), provider).await?);

        Ok(vc)
    }
}
