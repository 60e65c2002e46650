//! Shared HTTP plumbing for slidecast feature crates

#![allow(clippy::must_use_candidate)]

mod error;
mod payload;
mod vendor;

pub use error::{ErrorBody, HttpError, error_response};
pub use payload::JsonPayload;
pub use vendor::{ApiKey, MissingApiKey, http_client};
