//! In-process chat completions double for unit tests

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing,
};
use secrecy::SecretString;
use slidecast_config::SlidesConfig;
use tokio_util::sync::CancellationToken;

pub const VALID_DECK: &str = "<Slide layout=\"center\">\n# Rust\n<CodeBlock language=\"rust\">fn main() {}</CodeBlock>\n</Slide>";

pub struct MockChat {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    /// Reply text, split into three stream deltas when streaming
    content: String,
    /// Fail every request with this status
    status: Option<StatusCode>,
    request_count: AtomicU32,
    last_body: Mutex<Option<serde_json::Value>>,
}

impl MockChat {
    pub async fn start(content: &str) -> Self {
        Self::start_inner(content, None).await
    }

    pub async fn start_failing(status: StatusCode) -> Self {
        Self::start_inner("", Some(status)).await
    }

    async fn start_inner(content: &str, status: Option<StatusCode>) -> Self {
        let state = Arc::new(MockState {
            content: content.to_owned(),
            status,
            request_count: AtomicU32::new(0),
            last_body: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(chat_completions))
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

    pub fn config(&self) -> SlidesConfig {
        SlidesConfig {
            api_key: Some(SecretString::from("sk-test")),
            base_url: Some(format!("http://{}/v1", self.addr).parse().unwrap()),
            ..SlidesConfig::default()
        }
    }

    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    pub fn last_body(&self) -> Option<serde_json::Value> {
        self.state.last_body.lock().unwrap().clone()
    }
}

impl Drop for MockChat {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn chat_completions(State(state): State<Arc<MockState>>, Json(body): Json<serde_json::Value>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let stream = body["stream"].as_bool().unwrap_or(false);
    *state.last_body.lock().unwrap() = Some(body);

    if let Some(status) = state.status {
        return (status, Json(serde_json::json!({"error": {"message": "mock failure"}}))).into_response();
    }

    if !stream {
        return Json(serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": state.content},
                "finish_reason": "stop",
            }],
        }))
        .into_response();
    }

    let content = &state.content;
    let third = content.len() / 3;
    let parts = [&content[..third], &content[third..2 * third], &content[2 * third..]];

    let mut sse = String::from("data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n");
    for part in parts {
        let chunk = serde_json::json!({"choices": [{"index": 0, "delta": {"content": part}}]});
        sse.push_str(&format!("data: {chunk}\n\n"));
    }
    sse.push_str("data: [DONE]\n\n");

    ([("content-type", "text/event-stream")], sse).into_response()
}
