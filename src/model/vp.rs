//! # Verifiable Presentations
//!
//! A presentation combines one or more credentials for a verifier. The
//! holder wraps it in a signed envelope binding the verifier's audience and
//! nonce, preventing replay of a captured presentation.

use std::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BASE_CONTEXT;
use super::vc::VerifiableCredential;
use crate::proof::Proof;

/// A Verifiable Presentation: one or more credentials presented to a
/// verifier.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifiablePresentation {
    /// The @context property maps property URIs into short-form aliases.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Unique identifier for the presentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The presentation type(s). The first entry is always
    /// `VerifiablePresentation`.
    #[serde(rename = "type")]
    pub type_: Vec<String>,

    /// The entity generating the presentation (the holder's assertion of
    /// identity).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,

    /// The presented credentials.
    pub verifiable_credential: Vec<VerifiableCredential>,
}

impl VerifiablePresentation {
    /// Returns a new [`VpBuilder`].
    #[must_use]
    pub fn builder() -> VpBuilder {
        VpBuilder::new()
    }
}

/// The signed envelope submitted to a verifier: the presentation plus the
/// audience and nonce it is bound to.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct VpEnvelope {
    /// The wrapped presentation.
    pub vp: VerifiablePresentation,

    /// The verifier's client id the presentation is addressed to.
    pub aud: String,

    /// The per-request nonce issued by the verifier.
    pub nonce: String,

    /// The holder's proof over the envelope (computed with this field
    /// excluded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VpEnvelope {
    /// A copy of the envelope with the proof excluded, for signing and proof
    /// re-computation.
    #[must_use]
    pub fn unsigned(&self) -> Self {
        let mut envelope = self.clone();
        envelope.proof = None;
        envelope
    }
}

/// [`VpBuilder`] is used to build a [`VerifiablePresentation`].
#[derive(Clone, Default)]
pub struct VpBuilder {
    vp: VerifiablePresentation,
}

impl VpBuilder {
    /// Returns a new [`VpBuilder`] with sensible defaults.
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Self::default();
        builder.vp.id = Some(format!("urn:uuid:{}", Uuid::new_v4()));
        builder.vp.context.push(BASE_CONTEXT.into());
        builder.vp.type_.push("VerifiablePresentation".into());
        builder
    }

    /// Adds a type to the `type` property.
    #[must_use]
    pub fn add_type(mut self, type_: impl Into<String>) -> Self {
        self.vp.type_.push(type_.into());
        self
    }

    /// Adds a credential to the presentation.
    #[must_use]
    pub fn add_credential(mut self, vc: VerifiableCredential) -> Self {
        self.vp.verifiable_credential.push(vc);
        self
    }

    /// Sets the `holder` property.
    #[must_use]
    pub fn holder(mut self, holder: impl Into<String>) -> Self {
        self.vp.holder = Some(holder.into());
        self
    }

    /// Turns this builder into a [`VerifiablePresentation`].
    ///
    /// # Errors
    ///
    /// Fails if the presentation carries no credentials.
    pub fn build(self) -> crate::Result<VerifiablePresentation> {
        if self.vp.verifiable_credential.is_empty() {
            return Err(crate::Error::InvalidInput(
                "at least one credential is required".into(),
            ));
        }
        Ok(self.vp)
    }
}

impl FromStr for VerifiablePresentation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self, Self::Err> {
        if !s.starts_with('{') {
            // base64 encoded string
            let dec = Base64UrlUnpadded::decode_vec(s)?;
            return Ok(serde_json::from_slice(dec.as_slice())?);
        }
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::vc::CredentialSubject;

    fn base_vc() -> VerifiableCredential {
        let mut subject = CredentialSubject::default();
        subject.id = Some("did:example:ebfeb1f712ebc6f1c276e12ec21".into());
        subject.claims = json!({"name": "A"}).as_object().unwrap().clone();

        VerifiableCredential::builder()
            .add_type("UniversityDegree")
            .issuer("https://issuer.example.com")
            .subject(subject)
            .build()
            .expect("should build vc")
    }

    #[test]
    fn vp_build() {
        let vp = VerifiablePresentation::builder()
            .add_type("CredentialPresentation")
            .holder("holder:alice")
            .add_credential(base_vc())
            .build()
            .expect("should build vp");

        let vp_json = serde_json::to_value(&vp).expect("should serialize");
        assert_eq!(
            *vp_json.get("type").unwrap(),
            json!(["VerifiablePresentation", "CredentialPresentation"])
        );
        assert_eq!(vp.verifiable_credential.len(), 1);
    }

    #[test]
    fn empty_vp_fails() {
        assert!(VerifiablePresentation::builder().holder("holder:alice").build().is_err());
    }
}
