//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use slidecast_config::{Config, CorsConfig, TierLimitOverrides};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));

        Self { config }
    }

    /// Point every vendor at a mock backend with test keys
    pub fn with_mock_vendor(mut self, base_url: &str) -> Self {
        let url: reqwest::Url = base_url.parse().expect("valid URL");

        self.config.tts.openai.api_key = Some(SecretString::from("sk-test"));
        self.config.tts.openai.base_url = Some(url.clone());
        self.config.tts.elevenlabs.api_key = Some(SecretString::from("xi-test"));
        self.config.tts.elevenlabs.base_url = Some(url.clone());
        self.config.slides.api_key = Some(SecretString::from("sk-test"));
        self.config.slides.base_url = Some(url);
        self
    }

    /// Flat `OpenAI` speech limit per minute
    pub fn with_openai_limit(mut self, requests_per_minute: u32) -> Self {
        self.config.tts.openai.requests_per_minute = requests_per_minute;
        self
    }

    /// Override `ElevenLabs` tier limits
    pub fn with_elevenlabs_tiers(mut self, tiers: TierLimitOverrides) -> Self {
        self.config.tts.elevenlabs.tiers = tiers;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
