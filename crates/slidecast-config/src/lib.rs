#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod slides;
pub mod telemetry;
pub mod tts;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use server::*;
pub use slides::*;
pub use telemetry::*;
pub use tts::*;

/// Top-level slidecast configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Voiceover providers and limits
    #[serde(default)]
    pub tts: TtsConfig,
    /// Slide generation model settings
    #[serde(default)]
    pub slides: SlidesConfig,
    /// Log output configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
