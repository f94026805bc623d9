//! Verifier session state.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::verifier::types::{PresentationRequest, VerificationResult};

/// State durations.
#[allow(clippy::module_name_repetitions)]
pub enum Expire {
    /// Presentation request expiration.
    Request,
    /// Retention of a completed session's result.
    Result,
}

impl Expire {
    /// Duration of the state.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        match self {
            Self::Request => TimeDelta::try_minutes(5).unwrap_or_default(),
            Self::Result => TimeDelta::try_minutes(60).unwrap_or_default(),
        }
    }
}

/// Verification session, keyed by the request's `state` value.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct State {
    /// The presentation request this session was created for.
    pub request: PresentationRequest,

    /// Where the session is in its lifecycle.
    pub status: Status,

    /// Time state expires.
    pub expires_at: DateTime<Utc>,
}

impl State {
    /// Determines whether state has expired or not.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.signed_duration_since(Utc::now()).num_seconds() < 0
    }
}

/// Session lifecycle. A session moves from `Pending` to `Completed` exactly
/// once; the recorded result is never overwritten.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Awaiting a submission.
    Pending,

    /// Terminal: a submission was processed and its result frozen.
    Completed(VerificationResult),
}
