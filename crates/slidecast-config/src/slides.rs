use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Chat model settings for slide and script generation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlidesConfig {
    /// Falls back to `OPENAI_API_KEY` at first use
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub base_url: Option<Url>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Token cap for slide decks
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Token cap for narration scripts
    #[serde(default = "default_script_max_tokens")]
    pub script_max_tokens: u32,
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            script_max_tokens: default_script_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    2000
}

const fn default_script_max_tokens() -> u32 {
    1000
}
