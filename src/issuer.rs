//! # Issuer
//!
//! Endpoints for credential issuance using the pre-authorized code flow:
//! offer → pre-authorized code → access token → credential. Each offer moves
//! through `created → redeemed(token) → fulfilled(credential) | expired`,
//! with state persisted between steps through the provider's
//! [`StateStore`](crate::provider::StateStore).

mod handlers;
pub mod provider;
pub mod state;
pub mod types;

pub use handlers::{create_offer, credential, metadata, token};
