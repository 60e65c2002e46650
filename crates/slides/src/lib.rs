//! MDX slide deck generation over `OpenAI` chat completions

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
mod error;
mod generator;
mod handler;
pub mod mdx;
#[cfg(test)]
mod mock;
pub mod prompt;
mod protocol;

use std::sync::Arc;

use axum::{Router, routing::post};

pub use client::{ChatClient, TextStream};
pub use error::{Result, SlidesError};
pub use generator::{GenerateRequest, ScriptRequest, SlideGenerator};
pub use mdx::{MdxViolation, check_mdx, validate_mdx};

/// Build the generator from configuration
pub fn build_generator(config: &slidecast_config::SlidesConfig) -> Arc<SlideGenerator> {
    Arc::new(SlideGenerator::new(config))
}

/// Create the endpoint router for slide and script generation
pub fn endpoint_router() -> Router<Arc<SlideGenerator>> {
    Router::new()
        .route("/api/generate", post(handler::generate))
        .route("/api/voiceover/script", post(handler::voiceover_script))
}
