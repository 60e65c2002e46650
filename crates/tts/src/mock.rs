//! In-process speech vendor double for unit tests

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing,
};
use bytes::Bytes;
use secrecy::SecretString;
use slidecast_config::TtsConfig;
use tokio_util::sync::CancellationToken;

/// Ten bytes of "audio"
pub const AUDIO: &[u8] = b"0123456789";

#[derive(Clone)]
pub enum Behavior {
    /// Reply with [`AUDIO`] in two chunks
    Audio,
    /// Reply with the given status and JSON body
    Fail(StatusCode, serde_json::Value),
    /// Reply with an endless chunked body, one chunk every 10 ms
    Endless,
}

pub struct MockSpeech {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    behavior: Behavior,
    request_count: AtomicU32,
    last_body: Mutex<Option<serde_json::Value>>,
    last_headers: Mutex<HeaderMap>,
    last_path: Mutex<String>,
}

impl MockSpeech {
    pub async fn start(behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            request_count: AtomicU32::new(0),
            last_body: Mutex::new(None),
            last_headers: Mutex::new(HeaderMap::new()),
            last_path: Mutex::new(String::new()),
        });

        let app = Router::new()
            .route("/v1/audio/speech", routing::post(speech))
            .route("/v1/text-to-speech/{voice}", routing::post(speech))
            .route("/v1/text-to-speech/{voice}/stream", routing::post(speech))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown_clone.cancelled().await })
                .await
                .ok();
        });

        Self { addr, shutdown, state }
    }

    pub fn base_url(&self) -> url::Url {
        format!("http://{}/v1", self.addr).parse().unwrap()
    }

    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    pub fn last_body(&self) -> Option<serde_json::Value> {
        self.state.last_body.lock().unwrap().clone()
    }

    pub fn last_header(&self, name: &str) -> Option<String> {
        self.state
            .last_headers
            .lock()
            .unwrap()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    pub fn last_path(&self) -> String {
        self.state.last_path.lock().unwrap().clone()
    }

    /// Configuration pointing both providers at this mock with test keys
    pub fn config(&self) -> TtsConfig {
        let mut config = TtsConfig::default();

        config.openai.api_key = Some(SecretString::from("sk-test"));
        config.openai.base_url = Some(self.base_url());
        config.openai.requests_per_minute = 100;
        config.elevenlabs.api_key = Some(SecretString::from("xi-test"));
        config.elevenlabs.base_url = Some(self.base_url());

        config
    }
}

impl Drop for MockSpeech {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn speech(
    State(state): State<Arc<MockState>>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    *state.last_body.lock().unwrap() = Some(body);
    *state.last_headers.lock().unwrap() = headers;
    *state.last_path.lock().unwrap() = uri.path().to_string();

    match &state.behavior {
        Behavior::Audio => {
            let chunks = futures_util::stream::iter([
                Ok::<_, std::io::Error>(Bytes::from_static(&AUDIO[..4])),
                Ok(Bytes::from_static(&AUDIO[4..])),
            ]);

            ([("content-type", "audio/mpeg")], Body::from_stream(chunks)).into_response()
        }
        Behavior::Fail(status, body) => (*status, Json(body.clone())).into_response(),
        Behavior::Endless => {
            let chunks = futures_util::stream::unfold((), |()| async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Some((Ok::<_, std::io::Error>(Bytes::from_static(b"frame")), ()))
            });

            ([("content-type", "audio/mpeg")], Body::from_stream(chunks)).into_response()
        }
    }
}
