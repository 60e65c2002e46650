use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Voiceover configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// How the reported audio duration is estimated
    #[serde(default)]
    pub duration_estimator: DurationEstimator,
    /// Tier used when a request does not name one
    #[serde(default)]
    pub default_tier: TierName,
    #[serde(default)]
    pub openai: OpenAiTtsConfig,
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,
}

/// Duration estimation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEstimator {
    /// Word count at 150 words per minute scaled by speed
    #[default]
    Words,
    /// Body size at an assumed 128 kbit/s
    Bitrate,
}

/// Rate-limit tier names accepted in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierName {
    #[default]
    Free,
    Starter,
    Creator,
    Pro,
    Business,
    Enterprise,
}

/// `OpenAI` speech endpoint settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiTtsConfig {
    /// Falls back to `OPENAI_API_KEY` at first use
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Flat per-minute limit, independent of tier
    #[serde(default = "default_openai_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for OpenAiTtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            requests_per_minute: default_openai_requests_per_minute(),
        }
    }
}

const fn default_openai_requests_per_minute() -> u32 {
    3
}

/// `ElevenLabs` text-to-speech settings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElevenLabsConfig {
    /// Falls back to `ELEVENLABS_API_KEY` at first use
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Voice ID used when the request omits one
    #[serde(default)]
    pub default_voice: Option<String>,
    /// Model ID used when the request omits one
    #[serde(default)]
    pub default_model: Option<String>,
    /// Per-tier overrides of the built-in limit table
    #[serde(default)]
    pub tiers: TierLimitOverrides,
}

/// Requests per minute per tier; unset entries keep the built-in value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierLimitOverrides {
    pub free: Option<u32>,
    pub starter: Option<u32>,
    pub creator: Option<u32>,
    pub pro: Option<u32>,
    pub business: Option<u32>,
    pub enterprise: Option<u32>,
}

impl TierLimitOverrides {
    pub fn values(&self) -> [Option<u32>; 6] {
        [
            self.free,
            self.starter,
            self.creator,
            self.pro,
            self.business,
            self.enterprise,
        ]
    }
}
