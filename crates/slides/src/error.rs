use http::StatusCode;
use slidecast_core::{HttpError, MissingApiKey};
use thiserror::Error;

use crate::mdx::MdxViolation;

pub type Result<T> = std::result::Result<T, SlidesError>;

/// Errors raised while generating decks or scripts
#[derive(Debug, Error)]
pub enum SlidesError {
    /// Client sent a malformed or incomplete request
    #[error("{0}")]
    InvalidRequest(String),

    /// Generated deck failed the MDX heuristic
    #[error("generated content is not valid MDX: {0}")]
    InvalidMdx(MdxViolation),

    /// Chat completions call failed or returned something unusable
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Missing API key
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<MissingApiKey> for SlidesError {
    fn from(error: MissingApiKey) -> Self {
        Self::Config(error.to_string())
    }
}

impl HttpError for SlidesError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidMdx(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::InvalidMdx(_) => "invalid_mdx",
            Self::Upstream(_) => "upstream_error",
            Self::Config(_) => "configuration_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::InvalidRequest(message) => message.clone(),
            // The specific violation is only logged
            Self::InvalidMdx(_) => "Generated content is not valid MDX".to_owned(),
            Self::Upstream(_) | Self::Config(_) => "Failed to generate slides".to_owned(),
        }
    }
}

impl axum::response::IntoResponse for SlidesError {
    fn into_response(self) -> axum::response::Response {
        slidecast_core::error_response(&self)
    }
}
