//! Provider traits for the issuance endpoints.

use std::future::Future;

pub use crate::provider::{KeyResolver, Result, Signer, StateStore};

use crate::issuer::types::IssuerMetadata;

/// Issuer Provider trait.
pub trait Provider: Metadata + StateStore + Signer + KeyResolver + Clone {}

/// The `Metadata` trait is used by implementers to provide issuer metadata
/// to the library.
pub trait Metadata: Send + Sync {
    /// Metadata for this issuer.
    fn issuer(&self) -> impl Future<Output = Result<IssuerMetadata>> + Send;
}
