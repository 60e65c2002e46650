//! Mock vendor backend for integration tests
//!
//! Serves the `OpenAI` speech and chat endpoints and the `ElevenLabs`
//! text-to-speech endpoints from one listener under `/v1`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

/// Ten bytes of "audio" returned by every speech endpoint
pub const AUDIO: &[u8] = b"ID3\x04audio!";

/// A deck that passes MDX validation
pub const VALID_DECK: &str =
    "<Slide layout=\"center\">\n# Rust\n<CodeBlock language=\"rust\">fn main() {}</CodeBlock>\n</Slide>";

/// Mock vendor backend that returns predictable responses
pub struct MockVendor {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockVendorState>,
}

struct MockVendorState {
    speech_count: AtomicU32,
    chat_count: AtomicU32,
    /// Fail every request with 500 when set
    failing: AtomicBool,
    /// Stream speech forever instead of returning `AUDIO`
    endless: bool,
    chat_content: String,
    last_speech_path: Mutex<Option<String>>,
    last_speech_body: Mutex<Option<serde_json::Value>>,
    last_speech_key: Mutex<Option<String>>,
    last_chat_body: Mutex<Option<serde_json::Value>>,
}

impl MockVendor {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(false, VALID_DECK).await
    }

    /// Start a mock whose speech endpoints never finish their body
    pub async fn start_endless() -> anyhow::Result<Self> {
        Self::start_inner(true, VALID_DECK).await
    }

    /// Start a mock whose chat endpoint replies with `content`
    pub async fn start_with_chat(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(false, content).await
    }

    async fn start_inner(endless: bool, chat_content: &str) -> anyhow::Result<Self> {
        let state = Arc::new(MockVendorState {
            speech_count: AtomicU32::new(0),
            chat_count: AtomicU32::new(0),
            failing: AtomicBool::new(false),
            endless,
            chat_content: chat_content.to_owned(),
            last_speech_path: Mutex::new(None),
            last_speech_body: Mutex::new(None),
            last_speech_key: Mutex::new(None),
            last_chat_body: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/audio/speech", routing::post(handle_openai_speech))
            .route("/v1/text-to-speech/{voice}", routing::post(handle_elevenlabs_speech))
            .route("/v1/text-to-speech/{voice}/stream", routing::post(handle_elevenlabs_stream))
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as a vendor
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Make every following request fail with 500
    pub fn fail_all(&self) {
        self.state.failing.store(true, Ordering::Relaxed);
    }

    /// Number of speech requests received from either vendor API
    pub fn speech_count(&self) -> u32 {
        self.state.speech_count.load(Ordering::Relaxed)
    }

    /// Number of chat completion requests received
    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::Relaxed)
    }

    pub fn last_speech_path(&self) -> Option<String> {
        self.state.last_speech_path.lock().unwrap().clone()
    }

    pub fn last_speech_body(&self) -> Option<serde_json::Value> {
        self.state.last_speech_body.lock().unwrap().clone()
    }

    pub fn last_chat_body(&self) -> Option<serde_json::Value> {
        self.state.last_chat_body.lock().unwrap().clone()
    }

    /// Credential from `Authorization` or `xi-api-key` of the last speech request
    pub fn last_speech_key(&self) -> Option<String> {
        self.state.last_speech_key.lock().unwrap().clone()
    }
}

impl Drop for MockVendor {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn record_speech(state: &MockVendorState, path: String, key: Option<String>, body: serde_json::Value) {
    state.speech_count.fetch_add(1, Ordering::Relaxed);
    *state.last_speech_path.lock().unwrap() = Some(path);
    *state.last_speech_key.lock().unwrap() = key;
    *state.last_speech_body.lock().unwrap() = Some(body);
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

fn audio_response(state: &MockVendorState) -> Response {
    if state.failing.load(Ordering::Relaxed) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": {"message": "mock speech failure"}})),
        )
            .into_response();
    }

    if state.endless {
        let chunks = futures_util::stream::unfold((), |()| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Some((Ok::<_, std::io::Error>(Bytes::from_static(b"frame")), ()))
        });

        return ([("content-type", "audio/mpeg")], Body::from_stream(chunks)).into_response();
    }

    let chunks = futures_util::stream::iter([
        Ok::<_, std::io::Error>(Bytes::from_static(&AUDIO[..5])),
        Ok(Bytes::from_static(&AUDIO[5..])),
    ]);

    ([("content-type", "audio/mpeg")], Body::from_stream(chunks)).into_response()
}

async fn handle_openai_speech(
    State(state): State<Arc<MockVendorState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let key = header(&headers, "authorization").map(|v| v.trim_start_matches("Bearer ").to_owned());
    record_speech(&state, "/v1/audio/speech".to_owned(), key, body);

    audio_response(&state)
}

async fn handle_elevenlabs_speech(
    State(state): State<Arc<MockVendorState>>,
    Path(voice): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    record_speech(
        &state,
        format!("/v1/text-to-speech/{voice}"),
        header(&headers, "xi-api-key"),
        body,
    );

    audio_response(&state)
}

async fn handle_elevenlabs_stream(
    State(state): State<Arc<MockVendorState>>,
    Path(voice): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    record_speech(
        &state,
        format!("/v1/text-to-speech/{voice}/stream"),
        header(&headers, "xi-api-key"),
        body,
    );

    audio_response(&state)
}

async fn handle_chat_completions(
    State(state): State<Arc<MockVendorState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.chat_count.fetch_add(1, Ordering::Relaxed);
    *state.last_chat_body.lock().unwrap() = Some(body.clone());

    if state.failing.load(Ordering::Relaxed) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": {"message": "mock chat failure"}})),
        )
            .into_response();
    }

    if !body["stream"].as_bool().unwrap_or(false) {
        return Json(serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": body["model"],
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": state.chat_content},
                "finish_reason": "stop",
            }],
        }))
        .into_response();
    }

    let mut sse = String::new();
    for word in state.chat_content.split_inclusive(' ') {
        let chunk = serde_json::json!({"choices": [{"index": 0, "delta": {"content": word}}]});
        sse.push_str("data: ");
        sse.push_str(&chunk.to_string());
        sse.push_str("\n\n");
    }
    sse.push_str("data: [DONE]\n\n");

    ([("content-type", "text/event-stream")], sse).into_response()
}
