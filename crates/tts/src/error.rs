use http::StatusCode;
use slidecast_core::{HttpError, MissingApiKey};
use slidecast_ratelimit::{RateLimitError, Tier};
use thiserror::Error;

use crate::types::ProviderKind;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Message shown to API consumers for every non-validation failure
const GENERIC_MESSAGE: &str = "Failed to generate voiceover";

/// Voiceover errors
///
/// Every variant is terminal for the request that raised it.
#[derive(Debug, Error)]
pub enum TtsError {
    /// Bad or missing input
    #[error("{0}")]
    Validation(String),

    /// Voice is not one of the provider's known identifiers
    #[error("Invalid voice '{0}'")]
    InvalidVoice(String),

    /// The service instance used up its window for this tier
    #[error("Rate limit exceeded for {provider} {tier} tier")]
    RateLimitExceeded {
        provider: ProviderKind,
        tier: Tier,
        retry_after: u64,
    },

    /// Vendor returned a non-2xx status, malformed payload, or was unreachable
    #[error("{provider} API error: {message}")]
    Provider {
        provider: ProviderKind,
        status: Option<u16>,
        message: String,
    },

    /// Stream stopped by the caller or cut off mid-body
    #[error("Audio stream aborted: {0}")]
    StreamAborted(String),

    /// Missing API key or invalid limiter setup
    #[error("Configuration error: {0}")]
    Config(String),

    /// `start` called twice on a single-use controller
    #[error("Audio stream already started")]
    StreamStarted,
}

impl From<MissingApiKey> for TtsError {
    fn from(error: MissingApiKey) -> Self {
        Self::Config(error.to_string())
    }
}

impl TtsError {
    pub(crate) fn rate_limit(provider: ProviderKind, error: RateLimitError) -> Self {
        match error {
            RateLimitError::Exceeded { tier, retry_after, .. } => Self::RateLimitExceeded {
                provider,
                tier,
                retry_after,
            },
            RateLimitError::Config(message) => Self::Config(message),
        }
    }

    pub(crate) fn connection(provider: ProviderKind, error: &reqwest::Error) -> Self {
        Self::Provider {
            provider,
            status: None,
            message: format!("request failed: {error}"),
        }
    }

    /// Whether the error is the caller's fault
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidVoice(_))
    }
}

impl HttpError for TtsError {
    fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::InvalidVoice(_) => "invalid_voice",
            Self::RateLimitExceeded { .. } => "rate_limit_exceeded",
            Self::Provider { .. } => "provider_error",
            Self::StreamAborted(_) | Self::StreamStarted => "stream_aborted",
            Self::Config(_) => "configuration_error",
        }
    }

    fn client_message(&self) -> String {
        if self.is_validation() {
            self.to_string()
        } else {
            GENERIC_MESSAGE.to_string()
        }
    }
}

impl axum::response::IntoResponse for TtsError {
    fn into_response(self) -> axum::response::Response {
        slidecast_core::error_response(&self)
    }
}
