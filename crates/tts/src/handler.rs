use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use slidecast_core::JsonPayload;

use crate::{
    error::Result,
    registry::{ProviderRegistry, VoiceoverOptions},
    types::VoiceoverRequest,
};

/// Synthesize and return the whole audio body
pub(crate) async fn buffer(
    State(registry): State<Arc<ProviderRegistry>>,
    JsonPayload(request): JsonPayload<VoiceoverRequest>,
) -> Result<Response> {
    tracing::debug!(provider = %request.provider(), "buffered voiceover requested");

    let result = registry.generate_audio(&request).await?;

    Ok(result.into_response())
}

/// Relay vendor audio chunks as they arrive
pub(crate) async fn stream(
    State(registry): State<Arc<ProviderRegistry>>,
    JsonPayload(request): JsonPayload<VoiceoverRequest>,
) -> Result<Response> {
    tracing::debug!(provider = %request.provider(), "streamed voiceover requested");

    let mut controller = registry.create_stream(&request)?;
    let audio = controller.start().await?;
    let format = controller.format();

    // Headers are already sent, so a mid-stream failure can only cut the body short
    let body = Body::from_stream(audio.inspect_err(move |e| {
        tracing::error!(%format, "voiceover stream failed: {e}");
    }));

    Ok(([(http::header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// Providers, voices, formats and limits
pub(crate) async fn options(State(registry): State<Arc<ProviderRegistry>>) -> Json<VoiceoverOptions> {
    Json(registry.options())
}
