use std::str::FromStr;

use http::{HeaderName, HeaderValue, Method};
use slidecast_config::{AllowList, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Unparseable origins, methods or header names are configuration errors.
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let mut layer = CorsLayer::new();

    layer = match &config.origins {
        AllowList::Any => layer.allow_origin(AllowOrigin::any()),
        AllowList::Only(origins) => layer.allow_origin(parse_all::<HeaderValue>(origins, "origin")?),
    };

    layer = match &config.methods {
        AllowList::Any => layer.allow_methods(AllowMethods::any()),
        AllowList::Only(methods) => layer.allow_methods(parse_all::<Method>(methods, "method")?),
    };

    layer = match &config.headers {
        AllowList::Any => layer.allow_headers(AllowHeaders::any()),
        AllowList::Only(headers) => layer.allow_headers(parse_all::<HeaderName>(headers, "header")?),
    };

    if !config.expose_headers.is_empty() {
        layer = layer.expose_headers(parse_all::<HeaderName>(&config.expose_headers, "expose header")?);
    }

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    Ok(layer)
}

fn parse_all<T: FromStr>(values: &[String], what: &str) -> anyhow::Result<Vec<T>> {
    values
        .iter()
        .map(|value| {
            value
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid CORS {what}: '{value}'"))
        })
        .collect()
}
