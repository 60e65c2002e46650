use thiserror::Error;

use crate::Tier;

/// Rate limiting errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    /// Configuration error
    #[error("rate limit configuration error: {0}")]
    Config(String),

    /// The current window is used up
    #[error("rate limit of {limit} requests per window exceeded for {tier} tier")]
    Exceeded {
        tier: Tier,
        limit: u32,
        /// Seconds until the window resets
        retry_after: u64,
    },
}
