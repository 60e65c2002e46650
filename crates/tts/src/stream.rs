//! Single-use streamed synthesis
//!
//! A [`StreamController`] is created without touching the network. `start`
//! opens the vendor request and hands back an [`AudioStream`] that the
//! consumer pulls. Completion is the end of that stream; `stop` cancels the
//! request and the stream then yields exactly one
//! [`TtsError::StreamAborted`] before ending.

use std::{
    pin::Pin,
    task::{Context, Poll, ready},
};

use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream::BoxStream};
use reqwest::RequestBuilder;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use crate::{
    error::{Result, TtsError},
    provider::check_status,
    types::{AudioFormat, ProviderKind},
};

/// Controls one in-flight streamed synthesis
pub struct StreamController {
    provider: ProviderKind,
    format: AudioFormat,
    request: Option<RequestBuilder>,
    cancel: CancellationToken,
}

/// Cloneable handle that stops a stream from elsewhere
#[derive(Debug, Clone)]
pub struct StopHandle(CancellationToken);

impl StopHandle {
    pub fn stop(&self) {
        self.0.cancel();
    }
}

/// Totals reported when a stream completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub bytes: usize,
    pub chunks: usize,
}

impl StreamController {
    pub(crate) fn new(provider: ProviderKind, format: AudioFormat, request: RequestBuilder) -> Self {
        Self {
            provider,
            format,
            request: Some(request),
            cancel: CancellationToken::new(),
        }
    }

    pub const fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Open the vendor request
    ///
    /// Resolves once response headers arrive, so connection failures and
    /// vendor rejections are reported here rather than through the stream.
    /// A second call fails with [`TtsError::StreamStarted`].
    pub async fn start(&mut self) -> Result<AudioStream> {
        let request = self.request.take().ok_or(TtsError::StreamStarted)?;

        if self.cancel.is_cancelled() {
            return Err(TtsError::StreamAborted("stopped before start".to_string()));
        }

        let response = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                return Err(TtsError::StreamAborted("stopped while connecting".to_string()));
            }
            response = request.send() => response.map_err(|e| {
                tracing::error!(provider = %self.provider, "speech stream request failed: {e}");
                TtsError::connection(self.provider, &e)
            })?,
        };

        let response = check_status(self.provider, response).await?;

        tracing::debug!(provider = %self.provider, format = %self.format, "speech stream opened");

        Ok(AudioStream::new(
            self.provider,
            response.bytes_stream().boxed(),
            self.cancel.clone(),
        ))
    }

    /// Accepted for API symmetry; neither vendor can pause a stream
    pub fn pause(&self) {
        tracing::debug!(provider = %self.provider, "pause requested, vendor streams cannot pause");
    }

    /// Accepted for API symmetry; neither vendor can pause a stream
    pub fn resume(&self) {
        tracing::debug!(provider = %self.provider, "resume requested, vendor streams cannot pause");
    }

    /// Abort the request; idempotent
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.cancel.clone())
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Audio chunks relayed from the vendor as they arrive
pub struct AudioStream {
    provider: ProviderKind,
    inner: BoxStream<'static, reqwest::Result<Bytes>>,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
    finished: bool,
    summary: StreamSummary,
}

impl AudioStream {
    fn new(
        provider: ProviderKind,
        inner: BoxStream<'static, reqwest::Result<Bytes>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            provider,
            inner,
            cancelled: Box::pin(cancel.cancelled_owned()),
            finished: false,
            summary: StreamSummary::default(),
        }
    }

    /// Bytes and chunks relayed so far
    pub const fn summary(&self) -> StreamSummary {
        self.summary
    }

    /// Pass every chunk to `on_data` until the stream ends
    ///
    /// Resolves to the completion summary or to the single error that ended
    /// the stream, never both.
    pub async fn drive<F>(mut self, mut on_data: F) -> Result<StreamSummary>
    where
        F: FnMut(Bytes),
    {
        while let Some(chunk) = self.next().await {
            on_data(chunk?);
        }

        Ok(self.summary)
    }

    fn finish(&mut self) {
        self.finished = true;
        // Dropping the body aborts the underlying connection
        self.inner = futures_util::stream::empty().boxed();
    }
}

impl Stream for AudioStream {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }

        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.finish();
            tracing::debug!(provider = %this.provider, bytes = this.summary.bytes, "speech stream stopped");

            return Poll::Ready(Some(Err(TtsError::StreamAborted("stopped by caller".to_string()))));
        }

        loop {
            match ready!(this.inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) if chunk.is_empty() => {}
                Some(Ok(chunk)) => {
                    this.summary.bytes += chunk.len();
                    this.summary.chunks += 1;

                    return Poll::Ready(Some(Ok(chunk)));
                }
                Some(Err(e)) => {
                    this.finish();
                    tracing::error!(provider = %this.provider, "speech stream interrupted: {e}");

                    return Poll::Ready(Some(Err(TtsError::StreamAborted(format!("connection lost: {e}")))));
                }
                None => {
                    this.finished = true;
                    tracing::debug!(
                        provider = %this.provider,
                        bytes = this.summary.bytes,
                        chunks = this.summary.chunks,
                        "speech stream complete"
                    );

                    return Poll::Ready(None);
                }
            }
        }
    }
}
