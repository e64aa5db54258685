#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;

use falbot_queue::{JobHandle, JobQueue, JobStatus, QueueError};

pub const TEST_SECRET: &str = "test-secret";

/// Scripted responses and recorded requests of the fake queue server.
#[derive(Default)]
pub struct FakeQueueState {
    pub submit_response: Mutex<Option<(StatusCode, String)>>,
    pub statuses: Mutex<VecDeque<(StatusCode, String)>>,
    pub result_response: Mutex<Option<(StatusCode, String)>>,
    pub submitted: Mutex<Vec<serde_json::Value>>,
    pub status_calls: Mutex<Vec<String>>,
    /// `Authorization` header of every request, in arrival order.
    pub authorizations: Mutex<Vec<Option<String>>>,
}

impl FakeQueueState {
    pub fn push_status(&self, status: StatusCode, body: &str) {
        self.statuses
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn authorized(headers: &HeaderMap) -> bool {
    authorization(headers).is_some_and(|v| v == format!("Key {TEST_SECRET}"))
}

async fn submit(
    State(state): State<Arc<FakeQueueState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.authorizations.lock().unwrap().push(authorization(&headers));
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, r#"{"detail":"Unauthorized"}"#.into());
    }
    if let Ok(value) = serde_json::from_str(&body) {
        state.submitted.lock().unwrap().push(value);
    }
    state
        .submit_response
        .lock()
        .unwrap()
        .clone()
        .unwrap_or((StatusCode::OK, r#"{"request_id":"req-1"}"#.into()))
}

async fn status(
    State(state): State<Arc<FakeQueueState>>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.authorizations.lock().unwrap().push(authorization(&headers));
    state.status_calls.lock().unwrap().push(request_id);
    state
        .statuses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((StatusCode::OK, String::new()))
}

async fn response(
    State(state): State<Arc<FakeQueueState>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.authorizations.lock().unwrap().push(authorization(&headers));
    state.result_response.lock().unwrap().clone().unwrap_or((
        StatusCode::OK,
        r#"{"images":[{"url":"https://cdn.example/out.png"}]}"#.into(),
    ))
}

/// Start a fake fal queue on an ephemeral port and return its app URL.
pub async fn spawn_fake_queue(state: Arc<FakeQueueState>) -> String {
    let app = Router::new()
        .route("/fal/queue/submit/", post(submit))
        .route("/fal/queue/requests/{request_id}/status/", get(status))
        .route("/fal/queue/requests/{request_id}/response/", get(response))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A queue that replays a fixed sequence of status results.
pub struct ScriptedQueue {
    statuses: Mutex<VecDeque<Result<JobStatus, QueueError>>>,
    pub status_calls: Mutex<u32>,
}

impl ScriptedQueue {
    pub fn new(statuses: Vec<Result<JobStatus, QueueError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            status_calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        *self.status_calls.lock().unwrap()
    }
}

#[async_trait]
impl JobQueue for ScriptedQueue {
    async fn submit(&self, _payload: &serde_json::Value) -> Result<JobHandle, QueueError> {
        Ok(JobHandle::new("scripted"))
    }

    async fn status(&self, _handle: &JobHandle) -> Result<JobStatus, QueueError> {
        *self.status_calls.lock().unwrap() += 1;
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("poller called status after the script ended")
    }

    async fn result(&self, _handle: &JobHandle) -> Result<serde_json::Value, QueueError> {
        Ok(serde_json::json!({}))
    }
}
