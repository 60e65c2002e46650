pub(crate) mod elevenlabs;
pub(crate) mod openai;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::RequestBuilder;
use secrecy::SecretString;
use serde::Serialize;
use slidecast_config::{DurationEstimator, TtsConfig};
use slidecast_core::ApiKey;
use slidecast_ratelimit::{Tier, WindowLimiter};

use crate::{
    audio::{buffer_stream, estimate_duration, estimate_duration_from_size},
    constants::{DEFAULT_FORMAT, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED},
    error::{Result, TtsError},
    stream::StreamController,
    types::{AudioFormat, AudioResult, ProviderKind, SpeechParams, VoiceoverRequest},
};

/// Uniform contract over the speech vendors
#[async_trait]
pub trait AudioService: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Formats this provider can return
    fn supported_formats(&self) -> &'static [AudioFormat];

    /// Synthesize `request` and buffer the whole body
    async fn generate_audio(&self, request: &VoiceoverRequest) -> Result<AudioResult>;

    /// Prepare a streamed synthesis; nothing is sent until the controller starts
    fn create_stream(&self, request: &VoiceoverRequest) -> Result<StreamController>;

    /// Voices, models, formats and limits exposed by the options endpoint
    fn describe(&self) -> ProviderOptions;
}

/// Options advertised for one provider
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    pub provider: ProviderKind,
    /// Empty when the provider accepts arbitrary voice IDs
    pub voices: Vec<String>,
    pub models: Vec<String>,
    pub formats: Vec<AudioFormat>,
    pub default_voice: String,
    pub default_model: String,
    pub rate_limits: Vec<TierLimit>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierLimit {
    pub tier: Tier,
    /// `None` when the tier is unbounded
    pub requests_per_minute: Option<u32>,
}

/// Vendor-specific request shaping behind a [`Service`]
pub(crate) trait SpeechApi: Send + Sync {
    const KIND: ProviderKind;
    const FORMATS: &'static [AudioFormat];

    /// Resolve the voice and model for `request`, applying defaults
    fn voice_and_model(&self, request: &VoiceoverRequest) -> Result<(String, String)>;

    /// Build the vendor HTTP call for `params`
    fn speech_request(&self, params: &SpeechParams, api_key: &SecretString, streaming: bool) -> Result<RequestBuilder>;

    /// Options without rate limits
    fn options(&self) -> ProviderOptions;
}

/// A speech vendor with its own limiter and key
pub(crate) struct Service<A> {
    api: A,
    api_key: ApiKey,
    limiter: WindowLimiter,
    estimator: DurationEstimator,
    default_tier: Tier,
}

impl<A: SpeechApi> Service<A> {
    pub(crate) fn new(api: A, api_key: ApiKey, limiter: WindowLimiter, config: &TtsConfig) -> Self {
        Self {
            api,
            api_key,
            limiter,
            estimator: config.duration_estimator,
            default_tier: config.default_tier.into(),
        }
    }

    fn admit(&self, request: &VoiceoverRequest) -> Result<()> {
        let tier = request.tier.unwrap_or(self.default_tier);

        self.limiter.check(tier).map_err(|error| {
            tracing::warn!(provider = %A::KIND, %tier, "voiceover rejected: {error}");
            TtsError::rate_limit(A::KIND, error)
        })
    }

    fn params(&self, request: &VoiceoverRequest) -> Result<SpeechParams> {
        if request.content.trim().is_empty() {
            return Err(TtsError::Validation("Content is required".to_string()));
        }

        let format = resolve_format(request.format.as_deref(), A::KIND, A::FORMATS)?;
        let speed = resolve_speed(request.speed)?;
        let (voice, model) = self.api.voice_and_model(request)?;

        Ok(SpeechParams {
            content: request.content.clone(),
            voice,
            model,
            format,
            speed,
        })
    }

    /// Admission, validation and key lookup, in that order, then the vendor call
    fn prepare(&self, request: &VoiceoverRequest, streaming: bool) -> Result<(SpeechParams, RequestBuilder)> {
        self.admit(request)?;

        let params = self.params(request)?;
        let api_key = self.api_key.resolve()?;
        let builder = self.api.speech_request(&params, &api_key, streaming)?;

        tracing::debug!(
            provider = %A::KIND,
            voice = %params.voice,
            model = %params.model,
            format = %params.format,
            speed = params.speed,
            input_len = params.content.len(),
            streaming,
            "speech request prepared"
        );

        Ok((params, builder))
    }

    fn duration(&self, params: &SpeechParams, audio: &Bytes) -> f64 {
        match self.estimator {
            DurationEstimator::Words => estimate_duration(&params.content, params.speed),
            DurationEstimator::Bitrate => estimate_duration_from_size(audio.len()),
        }
    }
}

#[async_trait]
impl<A: SpeechApi> AudioService for Service<A> {
    fn kind(&self) -> ProviderKind {
        A::KIND
    }

    fn supported_formats(&self) -> &'static [AudioFormat] {
        A::FORMATS
    }

    async fn generate_audio(&self, request: &VoiceoverRequest) -> Result<AudioResult> {
        let (params, builder) = self.prepare(request, false)?;

        let response = builder.send().await.map_err(|e| {
            tracing::error!(provider = %A::KIND, "speech request failed: {e}");
            TtsError::connection(A::KIND, &e)
        })?;

        let response = check_status(A::KIND, response).await?;

        let audio = buffer_stream(response.bytes_stream()).await.map_err(|e| {
            tracing::error!(provider = %A::KIND, "failed to read audio body: {e}");
            TtsError::Provider {
                provider: A::KIND,
                status: None,
                message: format!("failed to read audio body: {e}"),
            }
        })?;

        if audio.is_empty() {
            return Err(TtsError::Provider {
                provider: A::KIND,
                status: None,
                message: "empty audio response".to_string(),
            });
        }

        let duration = self.duration(&params, &audio);

        tracing::debug!(provider = %A::KIND, bytes = audio.len(), duration, "speech synthesis complete");

        Ok(AudioResult {
            audio,
            format: params.format,
            duration,
        })
    }

    fn create_stream(&self, request: &VoiceoverRequest) -> Result<StreamController> {
        let (params, builder) = self.prepare(request, true)?;

        Ok(StreamController::new(A::KIND, params.format, builder))
    }

    fn describe(&self) -> ProviderOptions {
        let policy = self.limiter.policy();

        ProviderOptions {
            rate_limits: Tier::ALL
                .iter()
                .map(|&tier| TierLimit {
                    tier,
                    requests_per_minute: policy.limit_for(tier),
                })
                .collect(),
            ..self.api.options()
        }
    }
}

/// Build the service for `kind` with a fresh limiter
pub fn create_audio_service(kind: ProviderKind, config: &TtsConfig) -> Box<dyn AudioService> {
    match kind {
        ProviderKind::Openai => Box::new(openai::service(config)),
        ProviderKind::Elevenlabs => Box::new(elevenlabs::service(config)),
    }
}

fn resolve_format(requested: Option<&str>, kind: ProviderKind, supported: &[AudioFormat]) -> Result<AudioFormat> {
    let Some(name) = requested else {
        return Ok(DEFAULT_FORMAT);
    };

    let format: AudioFormat = name
        .parse()
        .map_err(|_| TtsError::Validation(format!("Unsupported audio format '{name}'")))?;

    if !supported.contains(&format) {
        return Err(TtsError::Validation(format!("Format '{format}' is not supported by {kind}")));
    }

    Ok(format)
}

fn resolve_speed(requested: Option<f64>) -> Result<f64> {
    let speed = requested.unwrap_or(DEFAULT_SPEED);

    if !speed.is_finite() || !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(TtsError::Validation(format!(
            "Speed must be between {MIN_SPEED} and {MAX_SPEED}"
        )));
    }

    Ok(speed)
}

/// Map a non-2xx vendor response to a provider error
pub(crate) async fn check_status(kind: ProviderKind, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = vendor_message(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status.to_string()
        } else {
            body
        }
    });

    tracing::warn!(provider = %kind, %status, "vendor rejected speech request: {message}");

    Err(TtsError::Provider {
        provider: kind,
        status: Some(status.as_u16()),
        message,
    })
}

/// Error message from an `OpenAI` or `ElevenLabs` error body
fn vendor_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    ["/error/message", "/detail/message", "/detail"]
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}
