use axum::body::Body;
use http::{StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::error::rejection;

/// Body limit for JSON requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

/// Extractor for JSON request bodies with JSON-shaped rejections
pub struct JsonPayload<T>(pub T);

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for JsonPayload<T>
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let is_json = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"));

        if !is_json {
            return Err(rejection(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                "Unsupported Content-Type, expected: 'Content-Type: application/json'".to_string(),
            ));
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
                rejection(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "payload_too_large",
                    format!("Request body is too large, limit is {BODY_LIMIT_BYTES} bytes"),
                )
            } else {
                rejection(
                    StatusCode::BAD_REQUEST,
                    "invalid_request_error",
                    format!("Failed to read request body: {err}"),
                )
            }
        })?;

        serde_json::from_slice::<T>(&bytes).map(Self).map_err(|e| {
            rejection(
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                format!("Failed to parse request body: {e}"),
            )
        })
    }
}
