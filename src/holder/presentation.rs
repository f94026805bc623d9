//! # Presentation
//!
//! The presentation endpoints drive the wallet's side of the presentation
//! flow: receive a presentation request, select a matching stored
//! credential, get the holder's authorization, then sign and submit the
//! presentation. Nothing is submitted before the holder authorizes.

mod authorize;
mod cancel;
mod present;
mod request;

use serde::{Deserialize, Serialize};

pub use authorize::{authorize, AuthorizeRequest};
pub use cancel::{cancel, CancelRequest};
pub use present::{present, PresentRequest};
pub use request::{request, RequestReceived};

use crate::holder::credential::Credential;
use crate::verifier::types::PresentationRequest;

/// `Presentation` represents the flow state across the steps of the
/// presentation flow, persisted between steps through the holder's state
/// store.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Presentation {
    /// The unique identifier for the presentation flow.
    pub id: String,

    /// The current status of the presentation flow.
    pub status: Status,

    /// The `PresentationRequest` received from the verifier.
    pub request: PresentationRequest,

    /// The stored credential selected to satisfy the request.
    pub credential: Credential,
}

/// Presentation Status values.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename = "PresentationStatus")]
pub enum Status {
    /// A request has been received, a credential matched, and the flow
    /// awaits the holder's decision.
    #[default]
    Requested,

    /// The holder has authorized the presentation.
    Authorized,
}
