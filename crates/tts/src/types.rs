use axum::response::IntoResponse;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use slidecast_ratelimit::Tier;

/// Speech vendors behind the voiceover endpoints
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Openai,
    Elevenlabs,
}

/// Audio containers a caller may request
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
}

impl AudioFormat {
    /// `Content-Type` for a response body in this format
    pub fn content_type(self) -> String {
        format!("audio/{self}")
    }
}

/// Voiceover request as accepted over HTTP
///
/// Every field but `content` is optional and defaulted per provider when
/// the request is resolved. `format` stays a string here so that an
/// unsupported value surfaces as a validation error rather than a JSON
/// parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceoverRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub tier: Option<Tier>,
}

impl VoiceoverRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    #[must_use]
    pub const fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Selected provider, `OpenAI` when omitted
    pub fn provider(&self) -> ProviderKind {
        self.provider.unwrap_or(crate::constants::DEFAULT_PROVIDER)
    }
}

/// Request with defaults applied and constraints checked
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpeechParams {
    pub content: String,
    pub voice: String,
    pub model: String,
    pub format: AudioFormat,
    pub speed: f64,
}

/// Fully buffered synthesis result
#[derive(Debug, Clone)]
pub struct AudioResult {
    pub audio: Bytes,
    pub format: AudioFormat,
    /// Estimated length in seconds
    pub duration: f64,
}

impl IntoResponse for AudioResult {
    /// Audio body with `Content-Type`, `Content-Length` and `X-Audio-Duration`
    fn into_response(self) -> axum::response::Response {
        axum::response::Response::builder()
            .header(http::header::CONTENT_TYPE, self.format.content_type())
            .header(http::header::CONTENT_LENGTH, self.audio.len())
            .header("X-Audio-Duration", self.duration.to_string())
            .body(axum::body::Body::from(self.audio))
            .unwrap_or_else(|_| {
                let mut response = axum::response::Response::new(axum::body::Body::empty());
                *response.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            })
    }
}
