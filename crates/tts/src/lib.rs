//! Voiceover generation over `OpenAI` and `ElevenLabs` speech APIs

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod audio;
pub mod constants;
mod error;
mod handler;
#[cfg(test)]
mod mock;
mod provider;
mod registry;
mod stream;
mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

pub use error::{Result, TtsError};
pub use provider::{AudioService, ProviderOptions, TierLimit, create_audio_service};
pub use registry::{ProviderRegistry, VoiceoverDefaults, VoiceoverOptions};
pub use stream::{AudioStream, StopHandle, StreamController, StreamSummary};
pub use slidecast_ratelimit::Tier;
pub use types::{AudioFormat, AudioResult, ProviderKind, VoiceoverRequest};

/// Build the provider registry from configuration
pub fn build_registry(config: &slidecast_config::TtsConfig) -> Arc<ProviderRegistry> {
    let registry = ProviderRegistry::new(config);
    tracing::debug!("Voiceover providers initialized");
    Arc::new(registry)
}

/// Create the endpoint router for voiceover
pub fn endpoint_router() -> Router<Arc<ProviderRegistry>> {
    Router::new()
        .route("/api/voiceover/buffer", post(handler::buffer))
        .route("/api/voiceover", post(handler::stream))
        .route("/api/voiceover/stream", post(handler::stream))
        .route("/api/voiceover/options", get(handler::options))
}
