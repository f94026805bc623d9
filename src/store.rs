//! # In-Memory State Store
//!
//! A single-process [`StateStore`] backed by a mutex-protected map. Each
//! service (issuer, verifier, holder) holds its own store handle — state is
//! injected, never a process-wide singleton.
//!
//! Entries carry an expiry timestamp and are evicted lazily: an expired
//! entry is removed and treated as absent on the next `get` or `take`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::provider::{Result, StateStore};

/// In-memory, thread-safe state store with lazy expiry.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, (Value, DateTime<Utc>)>>>,
}

impl InMemoryStore {
    /// Create a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStore {
    async fn put(&self, key: &str, state: impl Serialize + Send, expiry: DateTime<Utc>) -> Result<()> {
        let value = serde_json::to_value(state)?;
        self.entries.lock().expect("should lock").insert(key.to_string(), (value, expiry));
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let mut entries = self.entries.lock().expect("should lock");
        let Some((value, expiry)) = entries.get(key) else {
            return Err(anyhow!("state not found for key: {key}"));
        };
        if *expiry < Utc::now() {
            entries.remove(key);
            return Err(anyhow!("state not found for key: {key}"));
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    async fn take<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let mut entries = self.entries.lock().expect("should lock");
        let Some((value, expiry)) = entries.remove(key) else {
            return Err(anyhow!("state not found for key: {key}"));
        };
        if expiry < Utc::now() {
            return Err(anyhow!("state not found for key: {key}"));
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn purge(&self, key: &str) -> Result<()> {
        self.entries.lock().expect("should lock").remove(key);
        Ok(())
    }
}
