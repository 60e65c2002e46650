use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use slidecast_config::TtsConfig;
use slidecast_ratelimit::{LimitPolicy, TierLimits, WindowLimiter};
use url::Url;
use slidecast_core::{ApiKey, http_client};

use super::{ProviderOptions, Service, SpeechApi};
use crate::{
    constants::{ELEVENLABS_DEFAULT_MODEL, ELEVENLABS_DEFAULT_VOICE, ELEVENLABS_FORMATS, ELEVENLABS_MODELS, ELEVENLABS_MP3_OUTPUT},
    error::{Result, TtsError},
    types::{AudioFormat, ProviderKind, SpeechParams, VoiceoverRequest},
};

const DEFAULT_ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1";

/// `ElevenLabs` text-to-speech endpoints
pub(crate) struct ElevenLabsSpeech {
    client: Client,
    base_url: String,
    default_voice: String,
    default_model: String,
}

pub(crate) fn service(config: &TtsConfig) -> Service<ElevenLabsSpeech> {
    let elevenlabs = &config.elevenlabs;
    let base_url = elevenlabs
        .base_url
        .as_ref()
        .map_or(DEFAULT_ELEVENLABS_API_URL, Url::as_str)
        .trim_end_matches('/')
        .to_string();

    let limits = TierLimits::default().with_overrides(&elevenlabs.tiers);

    Service::new(
        ElevenLabsSpeech {
            client: http_client(),
            base_url,
            default_voice: elevenlabs
                .default_voice
                .clone()
                .unwrap_or_else(|| ELEVENLABS_DEFAULT_VOICE.to_string()),
            default_model: elevenlabs
                .default_model
                .clone()
                .unwrap_or_else(|| ELEVENLABS_DEFAULT_MODEL.to_string()),
        },
        ApiKey::new(elevenlabs.api_key.clone(), "ELEVENLABS_API_KEY"),
        WindowLimiter::new(LimitPolicy::Tiered(limits)),
        config,
    )
}

#[derive(Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
    speed: f64,
}

impl VoiceSettings {
    const fn with_speed(speed: f64) -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
            speed,
        }
    }
}

impl ElevenLabsSpeech {
    /// `{base}/text-to-speech/{voice}` with the voice ID path-encoded
    fn endpoint(&self, voice: &str, streaming: bool) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| TtsError::Config(format!("invalid ElevenLabs base URL '{}': {e}", self.base_url)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| TtsError::Config(format!("ElevenLabs base URL '{}' cannot have a path", self.base_url)))?;

            segments.pop_if_empty().push("text-to-speech").push(voice);

            if streaming {
                segments.push("stream");
            }
        }

        url.query_pairs_mut().append_pair("output_format", ELEVENLABS_MP3_OUTPUT);

        Ok(url)
    }
}

impl SpeechApi for ElevenLabsSpeech {
    const KIND: ProviderKind = ProviderKind::Elevenlabs;
    const FORMATS: &'static [AudioFormat] = &ELEVENLABS_FORMATS;

    fn voice_and_model(&self, request: &VoiceoverRequest) -> Result<(String, String)> {
        // Voice IDs are account specific, so any non-blank ID is accepted
        let voice = request.voice.as_deref().unwrap_or(&self.default_voice);

        if voice.trim().is_empty() {
            return Err(TtsError::InvalidVoice(voice.to_string()));
        }

        let model = request.model.as_deref().unwrap_or(&self.default_model);

        Ok((voice.to_string(), model.to_string()))
    }

    fn speech_request(&self, params: &SpeechParams, api_key: &SecretString, streaming: bool) -> Result<RequestBuilder> {
        let body = ElevenLabsRequest {
            text: &params.content,
            model_id: &params.model,
            voice_settings: VoiceSettings::with_speed(params.speed),
        };

        Ok(self
            .client
            .post(self.endpoint(&params.voice, streaming)?)
            .header("xi-api-key", api_key.expose_secret())
            .header(http::header::ACCEPT, "audio/mpeg")
            .json(&body))
    }

    fn options(&self) -> ProviderOptions {
        ProviderOptions {
            provider: Self::KIND,
            voices: Vec::new(),
            models: ELEVENLABS_MODELS.iter().map(ToString::to_string).collect(),
            formats: Self::FORMATS.to_vec(),
            default_voice: self.default_voice.clone(),
            default_model: self.default_model.clone(),
            rate_limits: Vec::new(),
        }
    }
}
