//! # Status Endpoint
//!
//! Reads the status of a verification session without modifying it.

use tracing::instrument;

use crate::error::Error;
use crate::verifier::provider::{Provider, StateStore};
use crate::verifier::state::{State, Status};
use crate::verifier::types::{StatusRequest, StatusResponse};
use crate::Result;

/// Status request handler.
///
/// # Errors
///
/// Returns `UnknownState` if the session is absent or expired.
#[instrument(level = "debug", skip(provider))]
pub async fn status(provider: impl Provider, request: StatusRequest) -> Result<StatusResponse> {
    tracing::debug!("status::process");

    let Ok(state) = StateStore::get::<State>(&provider, &request.state).await else {
        return Err(Error::UnknownState("presentation state is invalid".into()));
    };

    match state.status {
        Status::Pending => {
            if state.is_expired() {
                return Err(Error::UnknownState("presentation state is invalid".into()));
            }
            Ok(StatusResponse::Pending)
        }
        Status::Completed(result) => Ok(StatusResponse::Completed { result }),
    }
}
