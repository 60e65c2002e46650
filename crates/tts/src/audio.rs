//! Audio helpers shared by the buffered and streamed paths
//!
//! Duration estimates are approximations: no audio is decoded.

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

use crate::{
    constants::{ASSUMED_BITRATE, WORDS_PER_MINUTE},
    types::AudioFormat,
};

/// Concatenate every chunk of a byte stream into one buffer
///
/// Stops at the first error.
pub async fn buffer_stream<S, E>(stream: S) -> Result<Bytes, E>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut buffer = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }

    Ok(buffer.freeze())
}

/// Spoken length of `text` in seconds at `speed`
///
/// 150 words per minute at speed 1.0, scaled linearly by `speed`.
pub fn estimate_duration(text: &str, speed: f64) -> f64 {
    let words = text.split_whitespace().count();

    #[allow(clippy::cast_precision_loss)]
    let words = words as f64;

    words / (WORDS_PER_MINUTE * speed) * 60.0
}

/// Playback length in seconds of `len` bytes at the assumed bitrate
pub fn estimate_duration_from_size(len: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let bits = (len * 8) as f64;

    bits / ASSUMED_BITRATE
}

/// Whether `format` names one of the supported containers
pub fn validate_format(format: &str) -> bool {
    format.parse::<AudioFormat>().is_ok()
}
