//! # Holder
//!
//! The holder endpoints implement the wallet side of both flows: receiving a
//! credential offer and driving issuance, and receiving a presentation
//! request and driving presentation. Both flows gate all commitment effects
//! behind an explicit accept/authorize step by the holder.
//!
//! A failure at any step aborts the whole flow — the flow state is purged,
//! the error is surfaced, and already-stored credentials are untouched.

pub mod credential;
pub mod issuance;
pub mod presentation;
pub mod provider;

use crate::error::Error;

// Client call failures carry either a structured error from the remote party
// or a transport failure. Surface the former as-is, the latter as
// `UpstreamUnavailable`.
pub(crate) fn client_error(e: anyhow::Error) -> Error {
    e.downcast::<Error>()
        .unwrap_or_else(|e| Error::UpstreamUnavailable(format!("transport issue: {e}")))
}
