//! # Credential Model
//!
//! The canonical shape of a Verifiable Credential and Verifiable
//! Presentation, plus the declarative per-type claim schema consulted by
//! both issuer construction and wallet validation.

pub mod schema;
pub mod vc;
pub mod vp;

pub use vc::{CredentialSubject, VerifiableCredential};
pub use vp::{VerifiablePresentation, VpEnvelope};

/// Base context for all credentials and presentations.
pub const BASE_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
