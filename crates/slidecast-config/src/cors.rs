use std::time::Duration;

use serde::Deserialize;

/// CORS configuration for the browser front end
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default)]
    pub origins: AllowList,
    #[serde(default)]
    pub methods: AllowList,
    #[serde(default)]
    pub headers: AllowList,
    /// Response headers readable by the browser (e.g. `X-Audio-Duration`)
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// Preflight cache lifetime in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl CorsConfig {
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// `"*"` or an explicit list of values
///
/// A list containing `"*"` collapses to [`AllowList::Any`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub enum AllowList {
    #[default]
    Any,
    Only(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for AllowList {
    fn from(value: OneOrMany) -> Self {
        let values = match value {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        };

        if values.iter().any(|value| value == "*") {
            Self::Any
        } else {
            Self::Only(values)
        }
    }
}
