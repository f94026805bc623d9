//! # Token Endpoint
//!
//! Exchanges a pre-authorized code for an access token. The code is
//! single-use: redemption atomically removes it from the state store, so a
//! second redemption — including one racing the first — fails with
//! `UnknownCode`.

use chrono::Utc;
use tracing::instrument;

use crate::core::generate;
use crate::error::Error;
use crate::issuer::provider::{Provider, StateStore};
use crate::issuer::state::{Expire, Stage, State, Token};
use crate::issuer::types::{TokenRequest, TokenResponse, GRANT_TYPE_PRE_AUTHORIZED};
use crate::Result;

/// Token request handler.
///
/// # Errors
///
/// Returns `InvalidInput` for an unsupported grant type and `UnknownCode`
/// if the code is absent, expired, or already redeemed.
#[instrument(level = "debug", skip(provider))]
pub async fn token(provider: impl Provider, request: TokenRequest) -> Result<TokenResponse> {
    verify(&request)?;

    // code is one-time use: remove-and-return so two requests cannot both
    // redeem it
    let Ok(state) = StateStore::take::<State>(&provider, &request.pre_authorized_code).await
    else {
        return Err(Error::UnknownCode("pre-authorized code is invalid".into()));
    };

    let ctx = Context { state };
    ctx.process(&provider).await
}

fn verify(request: &TokenRequest) -> Result<()> {
    tracing::debug!("token::verify");

    if request.grant_type != GRANT_TYPE_PRE_AUTHORIZED {
        return Err(Error::InvalidInput("unsupported `grant_type`".into()));
    }
    if request.pre_authorized_code.is_empty() {
        return Err(Error::InvalidInput("no `pre-authorized_code` specified".into()));
    }
    Ok(())
}

#[derive(Debug)]
struct Context {
    state: State,
}

impl Context {
    // Exchange the pre-authorized code for an access token.
    async fn process(&self, provider: &impl Provider) -> Result<TokenResponse> {
        tracing::debug!("token::process");

        if self.state.is_expired() {
            return Err(Error::UnknownCode("pre-authorized code is invalid".into()));
        }
        let Stage::Offered(offer) = &self.state.stage else {
            return Err(Error::ServerError("offer state not set".into()));
        };

        let access_token = generate::token();
        let c_nonce = generate::nonce();

        // update state, re-keyed by the access token
        let state = State {
            subject_id: self.state.subject_id.clone(),
            stage: Stage::Validated(Token {
                access_token: access_token.clone(),
                c_nonce: c_nonce.clone(),
                offer: offer.clone(),
            }),
            expires_at: Utc::now() + Expire::Access.duration(),
        };
        StateStore::put(provider, &access_token, &state, state.expires_at)
            .await
            .map_err(|e| Error::ServerError(format!("issue saving state: {e}")))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".into(),
            expires_in: Expire::Access.duration().num_seconds(),
            c_nonce,
        })
    }
}
