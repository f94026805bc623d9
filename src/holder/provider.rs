//! # Holder Provider
//!
//! The provider traits used to inject functionality into the wallet
//! endpoints: clients for the issuer's and verifier's services, credential
//! storage, flow-state storage, and the holder's signing key.
//!
//! The client traits keep the wallet transport-layer agnostic: an
//! implementation may make HTTP calls or invoke the services directly.

use std::future::Future;

pub use crate::provider::{KeyResolver, Result, Signer, StateStore};

use crate::holder::credential::Credential;
use crate::issuer::types::{CredentialRequest, CredentialResponse, TokenRequest, TokenResponse};
use crate::verifier::types::{SubmitRequest, VerificationResult};

/// Holder Provider trait: all the capabilities the wallet endpoints depend
/// on.
pub trait HolderProvider:
    IssuerClient + VerifierClient + CredentialStorer + StateStore + Signer + KeyResolver + Clone
{
}

/// `IssuerClient` lets the wallet call an issuer's token and credential
/// services. An error aborts the issuance flow.
#[allow(clippy::module_name_repetitions)]
pub trait IssuerClient: Send + Sync {
    /// Exchange a pre-authorized code for an access token.
    fn token(&self, req: &TokenRequest) -> impl Future<Output = Result<TokenResponse>> + Send;

    /// Request a credential.
    fn credential(
        &self, req: &CredentialRequest,
    ) -> impl Future<Output = Result<CredentialResponse>> + Send;
}

/// `VerifierClient` lets the wallet submit a presentation to a verifier's
/// service. An error aborts the presentation flow.
#[allow(clippy::module_name_repetitions)]
pub trait VerifierClient: Send + Sync {
    /// Submit a signed presentation envelope.
    fn submit(
        &self, req: &SubmitRequest,
    ) -> impl Future<Output = Result<VerificationResult>> + Send;
}

/// `CredentialStorer` provides storage of the holder's credentials. The
/// wallet is the only writer of its own stored copies.
#[allow(clippy::module_name_repetitions)]
pub trait CredentialStorer: Send + Sync {
    /// Save a `Credential` to the store. Overwrites any existing credential
    /// with the same `id`.
    fn save(&self, credential: &Credential) -> impl Future<Output = Result<()>> + Send;

    /// Retrieve a `Credential` by `id`. Returns `None` if no credential with
    /// the `id` exists.
    fn load(&self, id: &str) -> impl Future<Output = Result<Option<Credential>>> + Send;

    /// Find credentials carrying any of the given types, in storage order.
    /// A `None` filter returns all stored credentials.
    fn find(
        &self, type_filter: Option<Vec<String>>,
    ) -> impl Future<Output = Result<Vec<Credential>>> + Send;

    /// Remove the credential with the given `id`. Errors if the credential
    /// does not exist.
    fn remove(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}
