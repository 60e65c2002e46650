use serde::Deserialize;
use slidecast_config::SlidesConfig;

use crate::{
    client::{ChatClient, TextStream},
    error::{Result, SlidesError},
    mdx::check_mdx,
    prompt::Prompt,
};

/// Body of the slide generation endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub current_content: Option<String>,
    /// Relay text as it is generated; `false` returns the whole deck after
    /// it passes the MDX check
    #[serde(default = "default_stream")]
    pub stream: bool,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            topic: String::new(),
            style: None,
            current_content: None,
            stream: default_stream(),
        }
    }
}

const fn default_stream() -> bool {
    true
}

/// Body of the narration script endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptRequest {
    #[serde(default)]
    pub content: String,
    /// Narration style, e.g. `natural`
    #[serde(default)]
    pub voice: Option<String>,
}

/// Slide deck and script generation over one chat client
pub struct SlideGenerator {
    client: ChatClient,
    max_tokens: u32,
    script_max_tokens: u32,
}

impl SlideGenerator {
    pub fn new(config: &SlidesConfig) -> Self {
        Self {
            client: ChatClient::new(config),
            max_tokens: config.max_tokens,
            script_max_tokens: config.script_max_tokens,
        }
    }

    fn slides_prompt(request: &GenerateRequest) -> Result<Prompt> {
        if request.topic.trim().is_empty() {
            return Err(SlidesError::InvalidRequest("Topic is required".to_owned()));
        }

        Ok(Prompt::slides(
            &request.topic,
            request.style.as_deref(),
            request.current_content.as_deref(),
        ))
    }

    /// Generate a whole deck and check it before returning
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let prompt = Self::slides_prompt(request)?;
        let content = self.client.complete(&prompt, self.max_tokens).await?;

        check_mdx(&content).map_err(|violation| {
            tracing::warn!(%violation, length = content.len(), "generated deck rejected");
            SlidesError::InvalidMdx(violation)
        })?;

        tracing::debug!(length = content.len(), "slide deck generated");

        Ok(content)
    }

    /// Stream a deck as it is generated; the result is not checked
    pub async fn generate_stream(&self, request: &GenerateRequest) -> Result<TextStream> {
        let prompt = Self::slides_prompt(request)?;

        self.client.complete_stream(&prompt, self.max_tokens).await
    }

    /// Stream a narration script for slide content
    pub async fn voiceover_script(&self, request: &ScriptRequest) -> Result<TextStream> {
        if request.content.trim().is_empty() {
            return Err(SlidesError::InvalidRequest("Content is required".to_owned()));
        }

        let prompt = Prompt::voiceover_script(&request.content, request.voice.as_deref());

        self.client.complete_stream(&prompt, self.script_max_tokens).await
    }
}
