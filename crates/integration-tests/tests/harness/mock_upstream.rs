//! Mock OpenAI-compatible upstream for integration tests
//!
//! Serves `/v1/images/generations` and `/v1/chat/completions` with behavior
//! selected per test, and records what it was sent.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Base64 for a 1x1 transparent PNG
pub const PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// How the image endpoint answers
#[derive(Debug, Clone)]
pub enum ImageBehavior {
    /// `200` with [`PNG_B64`]
    Succeed,
    /// Answer successfully only after the delay
    Delay(Duration),
    /// Never answer
    Hang,
    /// `500` for the first `n` calls, then succeed
    FailFirst(u32),
    /// Always answer with this status and `error.message`
    Error(StatusCode, &'static str),
    /// `200` with an empty `data` array
    Empty,
}

/// How the chat endpoint answers
#[derive(Debug, Clone)]
pub enum ChatBehavior {
    /// `200` with an assistant message holding this content
    Reply(&'static str),
    /// `200` with this exact message object as the first choice
    Message(Value),
    Error(StatusCode, &'static str),
}

/// Mock upstream backend
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    image: ImageBehavior,
    chat: ChatBehavior,
    image_count: AtomicU32,
    image_completed: AtomicU32,
    chat_count: AtomicU32,
    failures_left: AtomicU32,
    last_image_request: Mutex<Option<Value>>,
    last_chat_request: Mutex<Option<Value>>,
    last_headers: Mutex<Option<HeaderMap>>,
}

impl MockUpstream {
    /// Start a mock that succeeds on every endpoint
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(ImageBehavior::Succeed, ChatBehavior::Reply("Hi there!")).await
    }

    pub async fn with_image(behavior: ImageBehavior) -> anyhow::Result<Self> {
        Self::start_with(behavior, ChatBehavior::Reply("Hi there!")).await
    }

    pub async fn with_chat(behavior: ChatBehavior) -> anyhow::Result<Self> {
        Self::start_with(ImageBehavior::Succeed, behavior).await
    }

    async fn start_with(image: ImageBehavior, chat: ChatBehavior) -> anyhow::Result<Self> {
        let failures_left = match image {
            ImageBehavior::FailFirst(n) => n,
            _ => 0,
        };

        let state = Arc::new(MockState {
            image,
            chat,
            image_count: AtomicU32::new(0),
            image_completed: AtomicU32::new(0),
            chat_count: AtomicU32::new(0),
            failures_left: AtomicU32::new(failures_left),
            last_image_request: Mutex::new(None),
            last_chat_request: Mutex::new(None),
            last_headers: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/images/generations", routing::post(handle_image))
            .route("/v1/chat/completions", routing::post(handle_chat))
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

    /// Base URL including `/v1`, as the upstream client expects
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Image requests received
    pub fn image_count(&self) -> u32 {
        self.state.image_count.load(Ordering::SeqCst)
    }

    /// Image requests that ran to completion on the mock side
    pub fn image_completed(&self) -> u32 {
        self.state.image_completed.load(Ordering::SeqCst)
    }

    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::SeqCst)
    }

    pub fn last_image_request(&self) -> Option<Value> {
        self.state.last_image_request.lock().unwrap().clone()
    }

    pub fn last_chat_request(&self) -> Option<Value> {
        self.state.last_chat_request.lock().unwrap().clone()
    }

    /// Header value from the most recent request, if present
    pub fn last_header(&self, name: &str) -> Option<String> {
        self.state
            .last_headers
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|headers| headers.get(name))
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "message": message,
                "type": "mock_error"
            }
        })),
    )
        .into_response()
}

fn image_body() -> Response {
    Json(json!({
        "created": 1_700_000_000,
        "data": [{ "b64_json": PNG_B64 }]
    }))
    .into_response()
}

async fn handle_image(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.image_count.fetch_add(1, Ordering::SeqCst);
    *state.last_image_request.lock().unwrap() = Some(body);
    *state.last_headers.lock().unwrap() = Some(headers);

    let response = match &state.image {
        ImageBehavior::Succeed => image_body(),
        ImageBehavior::Delay(delay) => {
            tokio::time::sleep(*delay).await;
            image_body()
        }
        ImageBehavior::Hang => std::future::pending().await,
        ImageBehavior::FailFirst(_) => {
            let remaining = state.failures_left.load(Ordering::SeqCst);
            if remaining > 0 {
                state.failures_left.fetch_sub(1, Ordering::SeqCst);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "mock server intentional failure")
            } else {
                image_body()
            }
        }
        ImageBehavior::Error(status, message) => error_body(*status, message),
        ImageBehavior::Empty => Json(json!({ "created": 1_700_000_000, "data": [] })).into_response(),
    };

    state.image_completed.fetch_add(1, Ordering::SeqCst);
    response
}

async fn handle_chat(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.chat_count.fetch_add(1, Ordering::SeqCst);
    let model = body.get("model").cloned().unwrap_or(Value::Null);
    *state.last_chat_request.lock().unwrap() = Some(body);
    *state.last_headers.lock().unwrap() = Some(headers);

    let message = match &state.chat {
        ChatBehavior::Reply(content) => json!({ "role": "assistant", "content": content }),
        ChatBehavior::Message(message) => message.clone(),
        ChatBehavior::Error(status, message) => return error_body(*status, message),
    };

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{
            "index": 0,
            "message": message,
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}
