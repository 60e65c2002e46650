use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use slidecast_config::TtsConfig;
use slidecast_ratelimit::{LimitPolicy, WindowLimiter};
use slidecast_core::{ApiKey, http_client};

use super::{ProviderOptions, Service, SpeechApi};
use crate::{
    constants::{DEFAULT_MODEL, DEFAULT_VOICE, OPENAI_FORMATS, OPENAI_MODELS, OPENAI_VOICES},
    error::{Result, TtsError},
    types::{AudioFormat, ProviderKind, SpeechParams, VoiceoverRequest},
};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` audio speech endpoint
pub(crate) struct OpenAiSpeech {
    client: Client,
    base_url: String,
}

pub(crate) fn service(config: &TtsConfig) -> Service<OpenAiSpeech> {
    let openai = &config.openai;
    let base_url = openai
        .base_url
        .as_ref()
        .map_or(DEFAULT_OPENAI_API_URL, url::Url::as_str)
        .trim_end_matches('/')
        .to_string();

    Service::new(
        OpenAiSpeech {
            client: http_client(),
            base_url,
        },
        ApiKey::new(openai.api_key.clone(), "OPENAI_API_KEY"),
        WindowLimiter::new(LimitPolicy::Flat(openai.requests_per_minute)),
        config,
    )
}

#[derive(Serialize)]
struct OpenAiSpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: AudioFormat,
    speed: f64,
}

impl SpeechApi for OpenAiSpeech {
    const KIND: ProviderKind = ProviderKind::Openai;
    const FORMATS: &'static [AudioFormat] = &OPENAI_FORMATS;

    fn voice_and_model(&self, request: &VoiceoverRequest) -> Result<(String, String)> {
        let voice = request.voice.as_deref().unwrap_or(DEFAULT_VOICE);

        if !OPENAI_VOICES.contains(&voice) {
            return Err(TtsError::InvalidVoice(voice.to_string()));
        }

        let model = request.model.as_deref().unwrap_or(DEFAULT_MODEL);

        Ok((voice.to_string(), model.to_string()))
    }

    fn speech_request(&self, params: &SpeechParams, api_key: &SecretString, _streaming: bool) -> Result<RequestBuilder> {
        // The same endpoint serves both modes; streaming only changes how the body is read
        let body = OpenAiSpeechRequest {
            model: &params.model,
            input: &params.content,
            voice: &params.voice,
            response_format: params.format,
            speed: params.speed,
        };

        Ok(self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&body))
    }

    fn options(&self) -> ProviderOptions {
        ProviderOptions {
            provider: Self::KIND,
            voices: OPENAI_VOICES.iter().map(ToString::to_string).collect(),
            models: OPENAI_MODELS.iter().map(ToString::to_string).collect(),
            formats: Self::FORMATS.to_vec(),
            default_voice: DEFAULT_VOICE.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            rate_limits: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> OpenAiSpeech {
        OpenAiSpeech {
            client: Client::new(),
            base_url: "http://localhost:9/v1".to_string(),
        }
    }

    #[test]
    fn defaults_voice_and_model() {
        let (voice, model) = api().voice_and_model(&VoiceoverRequest::new("Hi")).unwrap();

        assert_eq!(voice, "alloy");
        assert_eq!(model, "tts-1");
    }

    #[test]
    fn rejects_unknown_voice() {
        let request = VoiceoverRequest::new("Hi").with_voice("Rachel");
        let error = api().voice_and_model(&request).unwrap_err();

        assert!(matches!(error, TtsError::InvalidVoice(voice) if voice == "Rachel"));
    }

    #[test]
    fn request_shape() {
        let params = SpeechParams {
            content: "Hello world".to_string(),
            voice: "nova".to_string(),
            model: "tts-1-hd".to_string(),
            format: AudioFormat::Opus,
            speed: 1.25,
        };

        let request = api()
            .speech_request(&params, &SecretString::from("sk-test"), false)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:9/v1/audio/speech");
        assert_eq!(request.headers()[http::header::AUTHORIZATION], "Bearer sk-test");

        let body: serde_json::Value = serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "model": "tts-1-hd",
                "input": "Hello world",
                "voice": "nova",
                "response_format": "opus",
                "speed": 1.25,
            })
        );
    }
}
