use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use slidecast_core::JsonPayload;

use crate::{
    client::TextStream,
    error::Result,
    generator::{GenerateRequest, ScriptRequest, SlideGenerator},
};

/// Handle `POST /api/generate`
pub(crate) async fn generate(
    State(generator): State<Arc<SlideGenerator>>,
    JsonPayload(request): JsonPayload<GenerateRequest>,
) -> Result<Response> {
    tracing::debug!(stream = request.stream, "slide generation requested");

    if request.stream {
        let deltas = generator.generate_stream(&request).await?;
        return Ok(text_stream_response(deltas));
    }

    let content = generator.generate(&request).await?;

    Ok(([(http::header::CONTENT_TYPE, "text/markdown; charset=utf-8")], content).into_response())
}

/// Handle `POST /api/voiceover/script`
pub(crate) async fn voiceover_script(
    State(generator): State<Arc<SlideGenerator>>,
    JsonPayload(request): JsonPayload<ScriptRequest>,
) -> Result<Response> {
    let deltas = generator.voiceover_script(&request).await?;

    Ok(text_stream_response(deltas))
}

fn text_stream_response(deltas: TextStream) -> Response {
    let body = Body::from_stream(deltas.inspect_err(|e| tracing::error!("text stream failed: {e}")));

    (
        [(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
