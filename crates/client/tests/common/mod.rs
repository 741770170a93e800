#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use toolhub_client::api::{ApiError, ToolhubApi};
use toolhub_client::poller::{PollConfig, StatusSource};
use toolhub_client::schemas::StatusResponse;
use toolhub_core::types::JobId;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a mock backend and a client pointed at it.
pub async fn backend() -> (MockServer, ToolhubApi) {
    // Unpooled, so dropping the server really closes its port.
    let server = MockServer::builder().start().await;
    let api = ToolhubApi::new(server.uri());
    (server, api)
}

/// A fast poll suitable for tests against a live mock server.
pub fn quick_poll() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(20),
        deadline: Some(Duration::from_secs(10)),
        ..Default::default()
    }
}

/// Serve `replies` in order from `GET /status/{job_id}`; the last one
/// repeats forever.
pub async fn mount_status_sequence(server: &MockServer, job_id: &str, replies: &[Value]) {
    let route = format!("/status/{job_id}");
    let (last, head) = replies.split_last().expect("at least one reply");
    for reply in head {
        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .up_to_n_times(1)
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(route.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(last))
        .mount(server)
        .await;
}

/// Requests the mock server received for `path`.
pub async fn hits(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

pub fn processing(progress: u32, message: &str) -> Value {
    json!({"status": "processing", "progress": progress, "message": message})
}

/// In-memory status source: each job reports a fixed status, unknown jobs
/// stay pending forever.
#[derive(Default)]
pub struct FixedStatuses {
    statuses: HashMap<JobId, StatusResponse>,
    calls: AtomicUsize,
}

impl FixedStatuses {
    pub fn with(mut self, job_id: &str, status: Value) -> Self {
        self.statuses.insert(
            JobId::new(job_id),
            serde_json::from_value(status).expect("valid status"),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl StatusSource for FixedStatuses {
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.statuses.get(job_id) {
            Some(status) => Ok(status.clone()),
            None => std::future::pending().await,
        }
    }
}
