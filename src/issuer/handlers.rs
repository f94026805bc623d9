//! Issuance endpoint handlers.

mod create_offer;
mod credential;
mod metadata;
mod token;

pub use create_offer::create_offer;
pub use credential::credential;
pub use metadata::metadata;
pub use token::token;
