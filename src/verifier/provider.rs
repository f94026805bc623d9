//! # Verifier Provider
//!
//! The provider traits the verifier endpoints depend on. Implementers supply
//! session storage, verifier metadata, and resolution of signing keys for
//! presented proofs.

use std::future::Future;

pub use crate::provider::{KeyResolver, Result, StateStore};

/// Verifier Provider trait.
pub trait Provider: Metadata + StateStore + KeyResolver + Clone {}

/// The `Metadata` trait is used by implementers to provide verifier metadata.
pub trait Metadata: Send + Sync {
    /// Verifier (client) metadata.
    fn verifier(&self) -> impl Future<Output = Result<VerifierMetadata>> + Send;
}

/// Static metadata describing this verifier to wallets.
#[derive(Clone, Debug, Default)]
pub struct VerifierMetadata {
    /// The verifier's client identifier — the audience presentations must
    /// be addressed to.
    pub client_id: String,

    /// The URI wallets submit presentations to.
    pub response_uri: String,
}
