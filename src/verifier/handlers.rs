//! Presentation endpoint handlers.

mod create_request;
mod status;
mod submit;

pub use create_request::create_request;
pub use status::status;
pub use submit::submit;
