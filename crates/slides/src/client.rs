//! `OpenAI` chat completions client for slide and script generation

use eventsource_stream::Eventsource;
use futures_util::{StreamExt, stream::BoxStream};
use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use slidecast_config::SlidesConfig;
use slidecast_core::{ApiKey, http_client};

use crate::{
    error::{Result, SlidesError},
    prompt::Prompt,
    protocol::{ChatChunk, ChatRequest, ChatResponse},
};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Text deltas relayed from a streamed completion
pub type TextStream = BoxStream<'static, Result<String>>;

/// Chat completions client
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
    model: String,
    temperature: f32,
}

impl ChatClient {
    pub fn new(config: &SlidesConfig) -> Self {
        let base_url = config
            .base_url
            .as_ref()
            .map_or(DEFAULT_BASE_URL, url::Url::as_str)
            .trim_end_matches('/')
            .to_owned();

        Self {
            client: http_client(),
            base_url,
            api_key: ApiKey::new(config.api_key.clone(), "OPENAI_API_KEY"),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    fn request(&self, prompt: &Prompt, max_tokens: u32, stream: bool) -> Result<RequestBuilder> {
        let api_key = self.api_key.resolve()?;

        let mut body = ChatRequest::new(&self.model, prompt, self.temperature, max_tokens);
        body.stream = stream;

        tracing::debug!(model = %self.model, max_tokens, stream, "chat completion request");

        Ok(self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&body))
    }

    async fn send(builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "upstream request failed");
            SlidesError::Upstream(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "upstream returned error");
            return Err(SlidesError::Upstream(format!("provider returned {status}: {body}")));
        }

        Ok(response)
    }

    /// Buffered completion, returning the first choice's text
    pub async fn complete(&self, prompt: &Prompt, max_tokens: u32) -> Result<String> {
        let response = Self::send(self.request(prompt, max_tokens, false)?).await?;

        let wire_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| SlidesError::Upstream(format!("failed to parse response: {e}")))?;

        wire_response
            .into_text()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| SlidesError::Upstream("response contained no content".to_owned()))
    }

    /// Streamed completion, yielding content deltas as they arrive
    pub async fn complete_stream(&self, prompt: &Prompt, max_tokens: u32) -> Result<TextStream> {
        let response = Self::send(self.request(prompt, max_tokens, true)?).await?;

        let deltas = response
            .bytes_stream()
            .eventsource()
            .map(|result| match result {
                Ok(event) => {
                    let data = event.data.trim();
                    if data == "[DONE]" {
                        return None;
                    }

                    match serde_json::from_str::<ChatChunk>(data) {
                        Ok(chunk) => {
                            let text = chunk.text();
                            (!text.is_empty()).then_some(Ok(text))
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, data = %data, "skipping unparseable SSE chunk");
                            None
                        }
                    }
                }
                Err(e) => Some(Err(SlidesError::Upstream(format!("stream interrupted: {e}")))),
            })
            .filter_map(futures_util::future::ready);

        Ok(deltas.boxed())
    }
}
