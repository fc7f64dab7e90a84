//! Mock DashScope backend for integration tests
//!
//! Serves the upload-policy API, an OSS-style upload host, and the domestic
//! and international ASR endpoints, recording what it receives

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// Directory the mock policy hands out
pub const UPLOAD_DIR: &str = "dashscope-instant/test/2025-01-01/abc";

/// Transcript returned by the default ASR response
pub const TRANSCRIPT: &str = "The quick brown fox jumps over the lazy dog.";

/// Mock DashScope backend
pub struct MockDashScope {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

/// An ASR call as received by the mock
#[derive(Debug, Clone)]
pub struct CapturedAsr {
    /// "domestic" or "international"
    pub region: &'static str,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// An object upload as received by the mock
#[derive(Debug, Clone, Default)]
pub struct CapturedUpload {
    /// Form field names in the order they arrived
    pub fields: Vec<String>,
    pub key: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file_size: usize,
}

struct MockState {
    upload_host: String,
    policy_count: AtomicU32,
    upload_count: AtomicU32,
    asr_count: AtomicU32,
    /// Status and body returned by the policy endpoint instead of a policy
    policy_failure: Option<(u16, String)>,
    asr_response: serde_json::Value,
    policy_queries: Mutex<Vec<HashMap<String, String>>>,
    uploads: Mutex<Vec<CapturedUpload>>,
    asr_requests: Mutex<Vec<CapturedAsr>>,
}

impl MockDashScope {
    /// Start a mock that accepts every call
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(None, default_asr_response()).await
    }

    /// Start a mock whose policy endpoint fails with `status` and `body`
    pub async fn start_with_policy_failure(status: u16, body: &str) -> anyhow::Result<Self> {
        Self::start_inner(Some((status, body.to_owned())), default_asr_response()).await
    }

    /// Start a mock whose ASR endpoints return `response`
    pub async fn start_with_asr_response(response: serde_json::Value) -> anyhow::Result<Self> {
        Self::start_inner(None, response).await
    }

    async fn start_inner(
        policy_failure: Option<(u16, String)>,
        asr_response: serde_json::Value,
    ) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockState {
            upload_host: format!("http://{addr}/oss"),
            policy_count: AtomicU32::new(0),
            upload_count: AtomicU32::new(0),
            asr_count: AtomicU32::new(0),
            policy_failure,
            asr_response,
            policy_queries: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            asr_requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/v1/uploads", routing::get(handle_policy))
            .route("/oss", routing::post(handle_upload))
            .route("/domestic/generation", routing::post(handle_domestic_asr))
            .route("/international/generation", routing::post(handle_international_asr))
            .layer(DefaultBodyLimit::disable())
            .with_state(Arc::clone(&state));

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

    /// Base URL for the upload-policy API
    pub fn storage_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn domestic_endpoint(&self) -> String {
        format!("http://{}/domestic/generation", self.addr)
    }

    pub fn international_endpoint(&self) -> String {
        format!("http://{}/international/generation", self.addr)
    }

    pub fn policy_count(&self) -> u32 {
        self.state.policy_count.load(Ordering::Relaxed)
    }

    pub fn upload_count(&self) -> u32 {
        self.state.upload_count.load(Ordering::Relaxed)
    }

    pub fn asr_count(&self) -> u32 {
        self.state.asr_count.load(Ordering::Relaxed)
    }

    /// Query parameters of every policy request
    pub fn policy_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.policy_queries.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<CapturedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn asr_requests(&self) -> Vec<CapturedAsr> {
        self.state.asr_requests.lock().unwrap().clone()
    }
}

impl Drop for MockDashScope {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// A complete ASR response for [`TRANSCRIPT`]
pub fn default_asr_response() -> serde_json::Value {
    json!({
        "request_id": "a1b2c3d4-mock",
        "output": {
            "choices": [{
                "finish_reason": "stop",
                "message": {
                    "role": "assistant",
                    "content": [{ "text": TRANSCRIPT }],
                    "annotations": [{ "type": "audio_info", "language": "en", "emotion": "neutral" }]
                }
            }]
        },
        "usage": {
            "input_tokens_details": { "text_tokens": 21 },
            "output_tokens_details": { "text_tokens": 10 },
            "seconds": 7.8
        }
    })
}

async fn handle_policy(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.policy_count.fetch_add(1, Ordering::Relaxed);
    state.policy_queries.lock().unwrap().push(query);

    if let Some((status, body)) = &state.policy_failure {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, body.clone()).into_response();
    }

    Json(json!({
        "request_id": "policy-mock",
        "data": {
            "policy": "eyJleHBpcmF0aW9uIjoiMjAyNS0wMS0wMVQwMDowMDowMFoifQ==",
            "signature": "mock-signature",
            "upload_dir": UPLOAD_DIR,
            "upload_host": state.upload_host,
            "expire_in_seconds": 300,
            "max_file_size_mb": 100,
            "capacity_limit_mb": 999_999_999,
            "oss_access_key_id": "LTAI-mock",
            "x_oss_object_acl": "private",
            "x_oss_forbid_overwrite": "true"
        }
    }))
    .into_response()
}

async fn handle_upload(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> StatusCode {
    state.upload_count.fetch_add(1, Ordering::Relaxed);

    let mut upload = CapturedUpload::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "key" => upload.key = field.text().await.ok(),
            "file" => {
                upload.file_name = field.file_name().map(str::to_owned);
                upload.content_type = field.content_type().map(str::to_owned);
                upload.file_size = field.bytes().await.map(|bytes| bytes.len()).unwrap_or_default();
            }
            _ => {}
        }

        upload.fields.push(name);
    }

    state.uploads.lock().unwrap().push(upload);

    StatusCode::OK
}

async fn handle_domestic_asr(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    record_asr(&state, "domestic", headers, body)
}

async fn handle_international_asr(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    record_asr(&state, "international", headers, body)
}

fn record_asr(
    state: &MockState,
    region: &'static str,
    headers: HeaderMap,
    body: serde_json::Value,
) -> Json<serde_json::Value> {
    state.asr_count.fetch_add(1, Ordering::Relaxed);
    state
        .asr_requests
        .lock()
        .unwrap()
        .push(CapturedAsr { region, headers, body });

    Json(state.asr_response.clone())
}
