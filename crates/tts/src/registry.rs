use serde::Serialize;
use slidecast_config::TtsConfig;

use crate::{
    constants::{DEFAULT_FORMAT, DEFAULT_MODEL, DEFAULT_PROVIDER, DEFAULT_SPEED, DEFAULT_VOICE},
    error::{Result, TtsError},
    provider::{AudioService, ProviderOptions, create_audio_service},
    stream::StreamController,
    types::{AudioFormat, AudioResult, ProviderKind, VoiceoverRequest},
};

/// Long-lived speech services, one per provider
///
/// Each service owns its rate-limit state, so the registry must outlive
/// the requests it serves.
pub struct ProviderRegistry {
    services: Vec<Box<dyn AudioService>>,
}

impl ProviderRegistry {
    /// Build every provider from configuration
    ///
    /// API keys are not required here; a missing key fails the first
    /// request that needs it.
    pub fn new(config: &TtsConfig) -> Self {
        let services = [ProviderKind::Openai, ProviderKind::Elevenlabs]
            .into_iter()
            .map(|kind| {
                tracing::debug!("Initializing speech provider: {kind}");
                create_audio_service(kind, config)
            })
            .collect();

        Self { services }
    }

    /// Service registered for `kind`
    pub fn get(&self, kind: ProviderKind) -> Result<&dyn AudioService> {
        self.services
            .iter()
            .find(|service| service.kind() == kind)
            .map(|service| &**service)
            .ok_or_else(|| TtsError::Config(format!("speech provider '{kind}' is not configured")))
    }

    /// Buffered synthesis on the provider named by `request`
    pub async fn generate_audio(&self, request: &VoiceoverRequest) -> Result<AudioResult> {
        self.get(request.provider())?.generate_audio(request).await
    }

    /// Streamed synthesis on the provider named by `request`
    pub fn create_stream(&self, request: &VoiceoverRequest) -> Result<StreamController> {
        self.get(request.provider())?.create_stream(request)
    }

    pub fn options(&self) -> VoiceoverOptions {
        VoiceoverOptions {
            providers: self.services.iter().map(|service| service.describe()).collect(),
            defaults: VoiceoverDefaults {
                provider: DEFAULT_PROVIDER,
                voice: DEFAULT_VOICE,
                model: DEFAULT_MODEL,
                format: DEFAULT_FORMAT,
                speed: DEFAULT_SPEED,
            },
        }
    }
}

/// Body of the options endpoint
#[derive(Debug, Clone, Serialize)]
pub struct VoiceoverOptions {
    pub providers: Vec<ProviderOptions>,
    pub defaults: VoiceoverDefaults,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceoverDefaults {
    pub provider: ProviderKind,
    pub voice: &'static str,
    pub model: &'static str,
    pub format: AudioFormat,
    pub speed: f64,
}
