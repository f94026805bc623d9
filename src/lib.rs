//! An API for the exchange of Verifiable Credentials between an issuer, a
//! holder's wallet, and a verifier.
//!
//! The library implements the pre-authorized code issuance flow
//! (offer → code → token → credential) and the presentation flow
//! (request → nonce/audience binding → signed presentation → verification).
//! Endpoints are transport-agnostic: an HTTP server, QR code, or deep link
//! delivers the same request and response types defined here.

pub mod core;
pub mod error;
pub mod holder;
pub mod issuer;
pub mod model;
pub mod proof;
pub mod provider;
pub mod store;
pub mod verifier;

pub mod test_utils;

pub use crate::core::Kind;
pub use crate::error::{Error, Result};
