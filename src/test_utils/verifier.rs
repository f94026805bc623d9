//! An in-process verifier provider backed by an in-memory store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::provider::{KeyResolver, Result, StateStore};
use crate::store::InMemoryStore;
use crate::test_utils::keystore::Keyring;
use crate::verifier::provider as verifier_provider;
use crate::verifier::provider::{Metadata, VerifierMetadata};

pub const CLIENT_ID: &str = "http://verifier.example.com";

#[derive(Clone, Debug, Default)]
pub struct Provider {
    store: InMemoryStore,
    keyring: Keyring,
}

impl Provider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl verifier_provider::Provider for Provider {}

impl Metadata for Provider {
    async fn verifier(&self) -> Result<VerifierMetadata> {
        Ok(VerifierMetadata {
            client_id: CLIENT_ID.into(),
            response_uri: format!("{CLIENT_ID}/present"),
        })
    }
}

impl StateStore for Provider {
    async fn put(
        &self, key: &str, state: impl Serialize + Send, expiry: DateTime<Utc>,
    ) -> Result<()> {
        self.store.put(key, state, expiry).await
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.store.get(key).await
    }

    async fn take<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.store.take(key).await
    }

    async fn purge(&self, key: &str) -> Result<()> {
        self.store.purge(key).await
    }
}

impl KeyResolver for Provider {
    async fn resolve(&self, method: &str) -> Result<[u8; 32]> {
        self.keyring.resolve(method).await
    }
}
