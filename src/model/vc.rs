//! # Verifiable Credentials
//!
//! The credential wire format: a signed envelope carrying type, issuer,
//! issuance and expiration dates, subject claims, and an embedded proof.

use std::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::BASE_CONTEXT;
use crate::proof::Proof;

/// A Verifiable Credential as issued and as presented.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifiableCredential {
    /// The @context property maps property URIs into short-form aliases.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Unique identifier for the credential.
    pub id: String,

    /// The credential type(s). The first entry is always
    /// `VerifiableCredential`.
    #[serde(rename = "type")]
    pub type_: Vec<String>,

    /// The identity of the issuing party.
    pub issuer: String,

    /// When the credential was issued.
    pub issuance_date: DateTime<Utc>,

    /// When the credential ceases to be valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,

    /// The claims asserted about the subject (holder).
    pub credential_subject: CredentialSubject,

    /// The issuer's proof over the credential (computed with this field
    /// excluded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiableCredential {
    /// Returns a new [`VcBuilder`].
    #[must_use]
    pub fn builder() -> VcBuilder {
        VcBuilder::new()
    }

    /// A copy of the credential with the proof excluded, for signing and
    /// proof re-computation.
    #[must_use]
    pub fn unsigned(&self) -> Self {
        let mut vc = self.clone();
        vc.proof = None;
        vc
    }

    /// Whether the credential carries the given type.
    #[must_use]
    pub fn has_type(&self, credential_type: &str) -> bool {
        self.type_.iter().any(|t| t == credential_type)
    }

    /// Whether the credential has passed its expiration date.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expiration_date.is_some_and(|exp| exp < Utc::now())
    }
}

/// The claims (attributes) asserted about the holder inside a credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CredentialSubject {
    /// An identifier of the subject of the claims.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The claims as a map of JSON values.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

/// [`VcBuilder`] is used to build a [`VerifiableCredential`].
#[derive(Clone, Default)]
pub struct VcBuilder {
    vc: VerifiableCredential,
}

impl VcBuilder {
    /// Returns a new [`VcBuilder`] with sensible defaults.
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Self::default();
        builder.vc.id = format!("urn:uuid:{}", Uuid::new_v4());
        builder.vc.context.push(BASE_CONTEXT.into());
        builder.vc.type_.push("VerifiableCredential".into());
        builder.vc.issuance_date = Utc::now();
        builder.vc.expiration_date = Some(Utc::now() + TimeDelta::days(365));
        builder
    }

    /// Adds a type to the `type` property.
    #[must_use]
    pub fn add_type(mut self, type_: impl Into<String>) -> Self {
        self.vc.type_.push(type_.into());
        self
    }

    /// Sets the `issuer` property.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.vc.issuer = issuer.into();
        self
    }

    /// Sets the `expirationDate` property.
    #[must_use]
    pub fn expiration_date(mut self, expires: DateTime<Utc>) -> Self {
        self.vc.expiration_date = Some(expires);
        self
    }

    /// Sets the `credentialSubject` property.
    #[must_use]
    pub fn subject(mut self, subject: CredentialSubject) -> Self {
        self.vc.credential_subject = subject;
        self
    }

    /// Turns this builder into a [`VerifiableCredential`].
    ///
    /// # Errors
    ///
    /// Fails if the credential's mandatory fields are not set.
    pub fn build(self) -> crate::Result<VerifiableCredential> {
        if self.vc.type_.len() < 2 {
            return Err(crate::Error::InvalidInput("credential type is required".into()));
        }
        if self.vc.issuer.is_empty() {
            return Err(crate::Error::InvalidInput("issuer is required".into()));
        }
        Ok(self.vc)
    }
}

impl FromStr for VerifiableCredential {
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
