//! State persisted between steps of the issuance process, keyed first by
//! pre-authorized code, then by access token.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// State for a single offer as it moves through the issuance lifecycle.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct State {
    /// Identifies the (previously authenticated) holder the offer is for.
    pub subject_id: String,

    /// Data relevant to the current stage of the issuance process.
    pub stage: Stage,

    /// Time state should expire.
    pub expires_at: DateTime<Utc>,
}

impl State {
    /// Determines whether state has expired or not.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Issuance stages.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// An offer awaiting redemption of its pre-authorized code. Keyed by the
    /// code.
    Offered(Offer),

    /// A redeemed offer awaiting credential issuance. Keyed by the access
    /// token.
    Validated(Token),
}

/// Offer data stored when the offer is created.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Offer {
    /// The credential type on offer.
    pub credential_type: String,

    /// The subject claims to issue.
    pub claims: Map<String, Value>,
}

/// Token state stored when the pre-authorized code is redeemed.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Token {
    /// The access token.
    pub access_token: String,

    /// The nonce the wallet must bind its proof of possession to.
    pub c_nonce: String,

    /// The originating offer data, carried forward for issuance.
    pub offer: Offer,
}

/// State expiry durations.
pub enum Expire {
    /// Offer (pre-authorized code) expiration.
    Offer,
    /// Access token expiration.
    Access,
}

impl Expire {
    /// Duration of the state.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        match self {
            Self::Offer => TimeDelta::try_minutes(5).unwrap_or_default(),
            Self::Access => TimeDelta::try_minutes(15).unwrap_or_default(),
        }
    }
}
