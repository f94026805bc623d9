//! Fixed Ed25519 key material for tests. Issuer, verifier, and holder each
//! hold their own key pair — separate trust domains.

use anyhow::anyhow;
use base64ct::{Base64UrlUnpadded, Encoding};
use ed25519_dalek::{SecretKey, Signer as _, SigningKey};

use crate::provider::{KeyResolver, Result, Signer};

pub const ISSUER_KEY_ID: &str = "issuer";
pub const VERIFIER_KEY_ID: &str = "verifier";
pub const HOLDER_KEY_ID: &str = "holder";

const SECRETS: &[(&str, &str)] = &[
    (ISSUER_KEY_ID, "q9EoyCmOLjvHyDxTjNVHyt0Ggyn0cfkTSqdUFQF3XoQ"),
    (VERIFIER_KEY_ID, "G2mFfIJvP74oNKjAuRC3zYoDMo0pFsAs19yKMocCxmE"),
    (HOLDER_KEY_ID, "0kPcYzTqXBWVmyJJonRZBvMDBMKKnV5mwhuB8uZPJg0"),
];

/// The verification method embedded in proofs signed with the given key.
#[must_use]
pub fn verification_method(key_id: &str) -> String {
    format!("did:web:{key_id}.example.com#key-0")
}

fn signing_key(key_id: &str) -> Result<SigningKey> {
    let Some((_, encoded)) = SECRETS.iter().find(|(id, _)| *id == key_id) else {
        return Err(anyhow!("unknown key: {key_id}"));
    };
    let decoded = Base64UrlUnpadded::decode_vec(encoded)?;
    let secret_key: SecretKey = decoded.try_into().map_err(|_| anyhow!("invalid secret key"))?;
    Ok(SigningKey::from_bytes(&secret_key))
}

/// A keyring holding all three parties' fixed test keys. Implements
/// [`KeyResolver`] for any of their verification methods.
#[derive(Clone, Debug, Default)]
pub struct Keyring;

impl Keyring {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// A [`Signer`] for the given party's key.
    #[must_use]
    pub fn signer(&self, key_id: &str) -> KeySigner {
        KeySigner {
            key_id: key_id.to_string(),
        }
    }
}

impl KeyResolver for Keyring {
    async fn resolve(&self, method: &str) -> Result<[u8; 32]> {
        let Some((key_id, _)) = SECRETS.iter().find(|(id, _)| verification_method(id) == method)
        else {
            return Err(anyhow!("unknown verification method: {method}"));
        };
        Ok(signing_key(key_id)?.verifying_key().to_bytes())
    }
}

/// Signs with one party's fixed test key.
#[derive(Clone, Debug)]
pub struct KeySigner {
    key_id: String,
}

impl Signer for KeySigner {
    async fn try_sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        Ok(signing_key(&self.key_id)?.sign(msg).to_bytes().to_vec())
    }

    fn verification_method(&self) -> String {
        verification_method(&self.key_id)
    }
}
