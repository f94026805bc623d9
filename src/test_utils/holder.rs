//! An in-process holder provider. The issuer and verifier client traits are
//! wired directly to the corresponding endpoint handlers, so wallet flows
//! run end-to-end without a transport.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::holder::credential::Credential;
use crate::holder::provider::{CredentialStorer, HolderProvider, IssuerClient, VerifierClient};
use crate::issuer::types::{CredentialRequest, CredentialResponse, TokenRequest, TokenResponse};
use crate::provider::{KeyResolver, Result, Signer, StateStore};
use crate::store::InMemoryStore;
use crate::test_utils::keystore::{self, Keyring, HOLDER_KEY_ID};
use crate::test_utils::{issuer, verifier};
use crate::verifier::types::{SubmitRequest, VerificationResult};

#[derive(Clone, Debug)]
pub struct Provider {
    store: InMemoryStore,
    credentials: Arc<Mutex<Vec<Credential>>>,
    keyring: Keyring,
    issuer: issuer::Provider,
    verifier: verifier::Provider,
}

impl Provider {
    #[must_use]
    pub fn new(issuer: issuer::Provider, verifier: verifier::Provider) -> Self {
        Self {
            store: InMemoryStore::new(),
            credentials: Arc::new(Mutex::new(Vec::new())),
            keyring: Keyring::new(),
            issuer,
            verifier,
        }
    }
}

impl HolderProvider for Provider {}

impl IssuerClient for Provider {
    async fn token(&self, req: &TokenRequest) -> Result<TokenResponse> {
        crate::issuer::token(self.issuer.clone(), req.clone()).await.map_err(Into::into)
    }

    async fn credential(&self, req: &CredentialRequest) -> Result<CredentialResponse> {
        crate::issuer::credential(self.issuer.clone(), req.clone()).await.map_err(Into::into)
    }
}

impl VerifierClient for Provider {
    async fn submit(&self, req: &SubmitRequest) -> Result<VerificationResult> {
        crate::verifier::submit(self.verifier.clone(), req.clone()).await.map_err(Into::into)
    }
}

impl CredentialStorer for Provider {
    async fn save(&self, credential: &Credential) -> Result<()> {
        let mut credentials = self.credentials.lock().expect("should lock");
        if let Some(existing) = credentials.iter_mut().find(|c| c.id == credential.id) {
            *existing = credential.clone();
        } else {
            credentials.push(credential.clone());
        }
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<Credential>> {
        let credentials = self.credentials.lock().expect("should lock");
        Ok(credentials.iter().find(|c| c.id == id).cloned())
    }

    async fn find(&self, type_filter: Option<Vec<String>>) -> Result<Vec<Credential>> {
        let credentials = self.credentials.lock().expect("should lock");
        let Some(filter) = type_filter else {
            return Ok(credentials.clone());
        };
        Ok(credentials
            .iter()
            .filter(|c| c.type_.iter().any(|t| filter.contains(t)))
            .cloned()
            .collect())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut credentials = self.credentials.lock().expect("should lock");
        let Some(index) = credentials.iter().position(|c| c.id == id) else {
            return Err(anyhow::anyhow!("no credential matching id: {id}"));
        };
        credentials.remove(index);
        Ok(())
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
        self.keyring.signer(HOLDER_KEY_ID).try_sign(msg).await
    }

    fn verification_method(&self) -> String {
        keystore::verification_method(HOLDER_KEY_ID)
    }
}

impl KeyResolver for Provider {
    async fn resolve(&self, method: &str) -> Result<[u8; 32]> {
        self.keyring.resolve(method).await
    }
}
