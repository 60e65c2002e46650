//! Local request limiting for voiceover providers
//!
//! Limits are counted per limiter instance in a fixed one-minute window.
//! Nothing is shared across processes.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod tier;
mod window;

pub use error::RateLimitError;
pub use tier::{LimitPolicy, Tier, TierLimits};
pub use window::WindowLimiter;
