//! Outbound plumbing shared by every vendor client

use std::{sync::OnceLock, time::Duration};

use reqwest::Client;
use secrecy::SecretString;
use thiserror::Error;

/// Common HTTP client to reuse connections across vendors
///
/// Only connection setup is bounded. A vendor that accepts the connection
/// and then stalls holds the request until the caller stops it.
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            let mut headers = http::HeaderMap::new();
            headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

            Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .tcp_nodelay(true)
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .default_headers(headers)
                .build()
                .expect("Failed to build default HTTP client")
        })
        .clone()
}

/// Neither configuration nor the environment supplied a key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{env_var} is not set")]
pub struct MissingApiKey {
    pub env_var: &'static str,
}

/// API key from configuration, falling back to the environment at first use
#[derive(Debug, Clone)]
pub struct ApiKey {
    configured: Option<SecretString>,
    env_var: &'static str,
}

impl ApiKey {
    pub const fn new(configured: Option<SecretString>, env_var: &'static str) -> Self {
        Self { configured, env_var }
    }

    /// Configured key, else `env_var` read now; blank values count as unset
    ///
    /// # Errors
    ///
    /// Returns [`MissingApiKey`] when neither source has a key
    pub fn resolve(&self) -> Result<SecretString, MissingApiKey> {
        if let Some(key) = &self.configured {
            return Ok(key.clone());
        }

        match std::env::var(self.env_var) {
            Ok(key) if !key.trim().is_empty() => Ok(SecretString::from(key)),
            _ => Err(MissingApiKey { env_var: self.env_var }),
        }
    }
}
