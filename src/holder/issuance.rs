//! # Issuance
//!
//! The issuance endpoints drive the wallet's side of the credential issuance
//! flow: receive an offer, get the holder's acceptance, exchange the
//! pre-authorized code for a token, request the credential with a proof of
//! possession, and save the result. Stored credentials are only touched by
//! the final `save` step, so an earlier failure makes no partial mutation.

mod accept;
mod cancel;
mod credential;
mod offer;
mod save;
mod token;

use serde::{Deserialize, Serialize};

pub use accept::{accept, AcceptRequest};
pub use cancel::{cancel, CancelRequest};
pub use credential::{credential, CredentialRequest};
pub use offer::{offer, OfferRequest};
pub use save::{save, SaveRequest};
pub use token::{token, TokenRequest};

use crate::holder::credential::Credential;
use crate::issuer::types::{CredentialOffer, TokenResponse};

/// `Issuance` represents the flow state across the steps of the issuance
/// flow, persisted between steps through the holder's state store.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Issuance {
    /// The unique identifier for the issuance flow.
    pub id: String,

    /// The current status of the issuance flow.
    pub status: Status,

    /// The `CredentialOffer` received from the issuer.
    pub offer: CredentialOffer,

    /// The `TokenResponse` received from the issuer.
    pub token: TokenResponse,

    /// The issued credential, buffered until the holder saves it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<Credential>,
}

/// Issuance Status values.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename = "IssuanceStatus")]
pub enum Status {
    /// A new credential offer has been received and awaits the holder's
    /// decision.
    #[default]
    Offered,

    /// The holder has accepted the offer.
    Accepted,

    /// An access token has been received from the issuer.
    TokenReceived,

    /// A credential has been received and verified, awaiting save.
    CredentialReceived,
}
