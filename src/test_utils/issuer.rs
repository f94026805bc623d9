//! An in-process issuer provider backed by an in-memory store and the
//! issuer's fixed test key.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::issuer::provider as issuer_provider;
use crate::issuer::provider::Metadata;
use crate::issuer::types::IssuerMetadata;
use crate::model::schema;
use crate::provider::{KeyResolver, Result, Signer, StateStore};
use crate::store::InMemoryStore;
use crate::test_utils::keystore::{self, Keyring, ISSUER_KEY_ID};

pub const CREDENTIAL_ISSUER: &str = "http://issuer.example.com";

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

impl issuer_provider::Provider for Provider {}

impl Metadata for Provider {
    async fn issuer(&self) -> Result<IssuerMetadata> {
        Ok(IssuerMetadata {
            credential_issuer: CREDENTIAL_ISSUER.into(),
            token_endpoint: format!("{CREDENTIAL_ISSUER}/token"),
            credential_endpoint: format!("{CREDENTIAL_ISSUER}/credential"),
            credential_types_supported: schema::supported_types(),
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

impl Signer for Provider {
    async fn try_sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        self.keyring.signer(ISSUER_KEY_ID).try_sign(msg).await
    }

    fn verification_method(&self) -> String {
        keystore::verification_method(ISSUER_KEY_ID)
    }
}

impl KeyResolver for Provider {
    async fn resolve(&self, method: &str) -> Result<[u8; 32]> {
        self.keyring.resolve(method).await
    }
}
