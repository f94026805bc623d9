//! # Verifier
//!
//! Endpoints for requesting and verifying credential presentations:
//! request → nonce/audience binding → signed presentation → verification
//! result. Each verification attempt is a single-use session keyed by
//! `state`, moving from `pending` to a terminal `completed` status.

mod handlers;
pub mod provider;
pub mod state;
pub mod types;

pub use handlers::{create_request, status, submit};
