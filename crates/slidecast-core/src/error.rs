use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type so that handlers share
/// one JSON error shape.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

/// Render a domain error, logging the full cause server side
pub fn error_response<E: HttpError>(error: &E) -> Response {
    let status = error.status_code();

    if status.is_server_error() {
        tracing::error!(error = %error, error_type = error.error_type(), "request failed");
    } else {
        tracing::debug!(error = %error, error_type = error.error_type(), "request rejected");
    }

    let body = ErrorBody {
        error: error.client_message(),
        error_type: error.error_type().to_string(),
    };

    (status, Json(body)).into_response()
}

/// Plain rejection body for requests that never reached a domain handler
pub(crate) fn rejection(status: StatusCode, error_type: &str, message: String) -> Response {
    let body = ErrorBody {
        error: message,
        error_type: error_type.to_string(),
    };

    (status, Json(body)).into_response()
}
