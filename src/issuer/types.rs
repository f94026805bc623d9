//! Request and response types for the issuance endpoints.

use std::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::VerifiableCredential;
use crate::proof::Proof;

/// The grant type for pre-authorized code issuance.
pub const GRANT_TYPE_PRE_AUTHORIZED: &str =
    "urn:ietf:params:oauth:grant-type:pre-authorized_code";

/// Format identifier for credentials issued as proof-embedded JSON.
pub const FORMAT_VC_JSON: &str = "vc_json";

/// A Credential Offer: issuer-originated object describing an available
/// credential and the code needed to claim it. Delivered to the wallet over
/// a side channel (QR code, deep link, paste).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialOffer {
    /// The issuer's endpoint, used by the wallet for the token and
    /// credential requests.
    pub credential_issuer: String,

    /// The credential type(s) on offer.
    pub credentials: Vec<String>,

    /// Grants available for redeeming the offer.
    pub grants: Grants,
}

impl FromStr for CredentialOffer {
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

/// Grants carried in a Credential Offer.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Grants {
    /// Pre-authorized code grant.
    #[serde(rename = "urn:ietf:params:oauth:grant-type:pre-authorized_code")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_authorized_code: Option<PreAuthorizedCodeGrant>,
}

/// The pre-authorized code grant: a one-time code the holder exchanges for
/// an access token without an interactive login.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PreAuthorizedCodeGrant {
    /// The single-use code.
    #[serde(rename = "pre-authorized_code")]
    pub pre_authorized_code: String,
}

/// A request to create a Credential Offer for a subject.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateOfferRequest {
    /// Identifies the (previously authenticated) holder the credential is
    /// offered to.
    pub subject_id: String,

    /// The type of credential on offer.
    pub credential_type: String,

    /// The subject claims to issue, keyed per the type's claim schema.
    pub credential_fields: Map<String, Value>,
}

/// The response to a Create Offer request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateOfferResponse {
    /// The offer to deliver to the wallet.
    pub offer: CredentialOffer,
}

/// A request to exchange a pre-authorized code for an access token.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TokenRequest {
    /// Must be [`GRANT_TYPE_PRE_AUTHORIZED`].
    pub grant_type: String,

    /// The pre-authorized code from the offer.
    #[serde(rename = "pre-authorized_code")]
    pub pre_authorized_code: String,
}

/// The response to a token request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TokenResponse {
    /// The single-use access token.
    pub access_token: String,

    /// Token type. Always `Bearer`.
    pub token_type: String,

    /// Seconds until the access token expires.
    pub expires_in: i64,

    /// A nonce the wallet must sign over in its credential-request proof of
    /// possession.
    pub c_nonce: String,
}

/// Claims the holder signs over to prove possession of its key when
/// requesting a credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PopClaims {
    /// The issuer the proof is addressed to.
    pub aud: String,

    /// The `c_nonce` from the token response.
    pub nonce: String,
}

/// Proof of possession: holder-signed claims binding the credential request
/// to the issuer and the token's nonce.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProofOfPossession {
    /// The signed claims.
    #[serde(flatten)]
    pub claims: PopClaims,

    /// The holder's proof over the claims.
    pub proof: Proof,
}

/// A request for credential issuance, authorized by an access token.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CredentialRequest {
    /// The Bearer access token from the token response.
    pub access_token: String,

    /// The requested credential format. Only [`FORMAT_VC_JSON`] is
    /// supported.
    pub format: String,

    /// The holder's proof of possession.
    pub proof: ProofOfPossession,
}

/// The response to a credential request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CredentialResponse {
    /// The credential format.
    pub format: String,

    /// The issued credential, proof embedded.
    pub credential: VerifiableCredential,
}

/// A request for issuer metadata (endpoint discovery).
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MetadataRequest {}

/// Issuer metadata.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct IssuerMetadata {
    /// The issuer identifier (endpoint base).
    pub credential_issuer: String,

    /// The token endpoint.
    pub token_endpoint: String,

    /// The credential endpoint.
    pub credential_endpoint: String,

    /// Credential types this issuer can mint.
    pub credential_types_supported: Vec<String>,
}

/// The response to a metadata request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MetadataResponse {
    /// The issuer's metadata.
    pub issuer: IssuerMetadata,
}
