//! # Proof Engine
//!
//! Produces and verifies a detached Ed25519 proof over a canonical
//! serialization of a payload. Used by the issuer to bind a credential's
//! claims to its key, and by the holder to bind a presentation to a
//! verifier's nonce and audience.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::provider::{KeyResolver, Signer};

/// The proof type produced by this engine.
pub const PROOF_TYPE: &str = "Ed25519Signature2020";

/// A detached proof binding a payload to a signing key.
///
/// The proof is computed over the canonical serialization of the payload
/// with the `proof` field itself excluded, and must be recomputed over the
/// identical exclusion before comparison.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Proof type. Always [`PROOF_TYPE`].
    #[serde(rename = "type")]
    pub type_: String,

    /// Identifies the verifying key a relying party should resolve.
    pub verification_method: String,

    /// When the proof was created.
    pub created: DateTime<Utc>,

    /// The base64url-encoded (unpadded) signature bytes.
    pub proof_value: String,
}

/// Serialize a payload to canonical bytes.
///
/// Serialization goes through [`serde_json::Value`], whose maps are ordered
/// by key, so two semantically equal payloads produce identical bytes
/// regardless of field order in the source.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized to JSON.
pub fn canonical_bytes(payload: &impl Serialize) -> crate::Result<Vec<u8>> {
    let value = serde_json::to_value(payload)
        .map_err(|e| Error::ServerError(format!("issue canonicalizing payload: {e}")))?;
    serde_json::to_vec(&value)
        .map_err(|e| Error::ServerError(format!("issue canonicalizing payload: {e}")))
}

/// Create a proof over the canonical form of `payload`.
///
/// # Errors
///
/// Signing failures (bad or unavailable key) are fatal to the calling
/// request and surface as `ServerError`.
pub async fn create(payload: &impl Serialize, signer: &impl Signer) -> crate::Result<Proof> {
    let msg = canonical_bytes(payload)?;
    let sig = signer
        .try_sign(&msg)
        .await
        .map_err(|e| Error::ServerError(format!("issue signing payload: {e}")))?;

    Ok(Proof {
        type_: PROOF_TYPE.into(),
        verification_method: signer.verification_method(),
        created: Utc::now(),
        proof_value: Base64UrlUnpadded::encode_string(&sig),
    })
}

/// Verify a proof over the canonical form of `payload`.
///
/// Returns `false` on any failure — malformed proof structure, unresolvable
/// verification method, or signature mismatch — never an error, feeding the
/// caller's own error path.
pub async fn verify(
    payload: &impl Serialize, proof: &Proof, resolver: &impl KeyResolver,
) -> bool {
    if proof.type_ != PROOF_TYPE {
        return false;
    }
    let Ok(msg) = canonical_bytes(payload) else {
        return false;
    };
    let Ok(key_bytes) = resolver.resolve(&proof.verification_method).await else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let Ok(sig_bytes) = Base64UrlUnpadded::decode_vec(&proof.proof_value) else {
        return false;
    };
    let Ok(sig_array) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
        return false;
    };
    let signature = Signature::from_bytes(&sig_array);

    verifying_key.verify_strict(&msg, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::keystore::{Keyring, ISSUER_KEY_ID};

    #[tokio::test]
    async fn sign_verify_roundtrip() {
        let keyring = Keyring::new();
        let signer = keyring.signer(ISSUER_KEY_ID);

        let payload = json!({"b": 1, "a": {"z": true, "y": "x"}});
        let proof = create(&payload, &signer).await.expect("should sign");

        assert!(verify(&payload, &proof, &keyring).await);
    }

    #[tokio::test]
    async fn mutated_payload_fails() {
        let keyring = Keyring::new();
        let signer = keyring.signer(ISSUER_KEY_ID);

        let payload = json!({"claim": "original"});
        let proof = create(&payload, &signer).await.expect("should sign");

        let mutated = json!({"claim": "tampered"});
        assert!(!verify(&mutated, &proof, &keyring).await);
    }

    #[tokio::test]
    async fn field_order_is_canonical() {
        let keyring = Keyring::new();
        let signer = keyring.signer(ISSUER_KEY_ID);

        let payload = json!({"a": 1, "b": 2});
        let reordered: serde_json::Value =
            serde_json::from_str(r#"{"b": 2, "a": 1}"#).expect("should parse");

        let proof = create(&payload, &signer).await.expect("should sign");
        assert!(verify(&reordered, &proof, &keyring).await);
    }

    #[tokio::test]
    async fn malformed_proof_returns_false() {
        let keyring = Keyring::new();
        let signer = keyring.signer(ISSUER_KEY_ID);

        let payload = json!({"claim": "value"});
        let mut proof = create(&payload, &signer).await.expect("should sign");

        proof.proof_value = "not base64!!".into();
        assert!(!verify(&payload, &proof, &keyring).await);

        let mut proof2 = create(&payload, &signer).await.expect("should sign");
        proof2.verification_method = "unknown-key".into();
        assert!(!verify(&payload, &proof2, &keyring).await);

        let mut proof3 = create(&payload, &signer).await.expect("should sign");
        proof3.type_ = "RsaSignature2018".into();
        assert!(!verify(&payload, &proof3, &keyring).await);
    }
}
