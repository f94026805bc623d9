//! # Provider
//!
//! Traits implementers use to inject state storage and key material into the
//! issuer, verifier, and holder endpoints. Provider errors use
//! [`anyhow::Error`] and are mapped to structured endpoint errors at the
//! handler boundary.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Result type for provider implementations.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// `StateStore` is used to store and retrieve server state between requests.
///
/// Implementations must make each single-key operation atomic with respect to
/// concurrent requests for the same key. In particular, [`StateStore::take`]
/// removes and returns in one step so a code or token cannot be redeemed
/// twice by two racing requests.
pub trait StateStore: Send + Sync {
    /// Store state using the provided key. The expiry parameter indicates
    /// when data can be expunged from the state store.
    fn put(
        &self, key: &str, state: impl Serialize + Send, expiry: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Retrieve data using the provided key. Expired data is treated as
    /// absent.
    fn get<T: DeserializeOwned>(&self, key: &str) -> impl Future<Output = Result<T>> + Send;

    /// Atomically remove and return data using the provided key. Expired
    /// data is treated as absent.
    fn take<T: DeserializeOwned>(&self, key: &str) -> impl Future<Output = Result<T>> + Send;

    /// Remove data using the key provided.
    fn purge(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}

/// `Signer` provides detached signing for one of the three parties. Each of
/// issuer, verifier, and holder is a separate trust domain with its own key
/// pair.
pub trait Signer: Send + Sync {
    /// Sign the provided message bytes.
    fn try_sign(&self, msg: &[u8]) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// The verification method (key identifier) to embed in proofs so a
    /// relying party can resolve the verifying key.
    fn verification_method(&self) -> String;
}

/// `KeyResolver` resolves a proof's verification method to Ed25519 verifying
/// key bytes.
pub trait KeyResolver: Send + Sync {
    /// Resolve the verifying key for the given verification method.
    fn resolve(&self, method: &str) -> impl Future<Output = Result<[u8; 32]>> + Send;
}
