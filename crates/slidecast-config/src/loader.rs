use std::path::Path;

use url::Url;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, variable expansion
    /// fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than the file not existing
    pub fn load_optional(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Parse configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_tts()?;
        self.validate_slides()?;
        Ok(())
    }

    fn validate_tts(&self) -> anyhow::Result<()> {
        if self.tts.openai.requests_per_minute == 0 {
            anyhow::bail!("tts.openai.requests_per_minute must be greater than 0");
        }

        if self.tts.elevenlabs.tiers.values().contains(&Some(0)) {
            anyhow::bail!("tts.elevenlabs.tiers limits must be greater than 0");
        }

        validate_base_url("tts.openai.base_url", self.tts.openai.base_url.as_ref())?;
        validate_base_url("tts.elevenlabs.base_url", self.tts.elevenlabs.base_url.as_ref())?;

        Ok(())
    }

    fn validate_slides(&self) -> anyhow::Result<()> {
        let slides = &self.slides;

        if slides.model.trim().is_empty() {
            anyhow::bail!("slides.model must not be empty");
        }

        if !(0.0..=2.0).contains(&slides.temperature) {
            anyhow::bail!("slides.temperature must be between 0 and 2");
        }

        if slides.max_tokens == 0 || slides.script_max_tokens == 0 {
            anyhow::bail!("slides token limits must be greater than 0");
        }

        validate_base_url("slides.base_url", slides.base_url.as_ref())
    }
}

fn validate_base_url(field: &str, url: Option<&Url>) -> anyhow::Result<()> {
    match url {
        Some(url) if !matches!(url.scheme(), "http" | "https") => {
            anyhow::bail!("{field} must use http or https, got '{}'", url.scheme())
        }
        _ => Ok(()),
    }
}
