#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use triagent::backend::BackendClient;
use triagent::config::types::{BackendConfig, InferenceConfig, PipelineSettings};
use triagent::event::LogEvent;
use triagent::inference::InferenceClient;
use triagent::pipeline::RemediationPipeline;

/// Everything the mock incident backend has observed, in arrival order.
#[derive(Debug, Default)]
pub struct BackendState {
    pub incidents: Vec<Value>,
    /// (channel, entry payload) in the order writes arrived
    pub timeline: Vec<(String, Value)>,
    pub root_causes: Vec<Value>,
    pub plans: Vec<Value>,
    pub kb_queries: Vec<String>,
    /// Operation names that should fail with 500
    pub fail: HashSet<String>,
}

type SharedBackendState = Arc<Mutex<BackendState>>;

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: SharedBackendState,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: SharedBackendState = Arc::new(Mutex::new(BackendState::default()));

        let app = Router::new()
            .route("/api/incidents", post(create_incident))
            .route(
                "/api/incidents/:id/timeline/:channel/audit-trail",
                post(append_timeline_entry),
            )
            .route("/api/incidents/:id/root-cause", post(set_root_cause))
            .route("/api/kb/search", get(kb_search))
            .route("/api/incidents/:id/resolution-plan", post(create_plan))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Make the named operation fail with 500 from now on.
    /// Operations: incidents, timeline, root-cause, kb, resolution-plan
    pub fn fail_on(&self, op: &str) {
        self.state.lock().unwrap().fail.insert(op.to_string());
    }

    pub fn incident_count(&self) -> usize {
        self.state.lock().unwrap().incidents.len()
    }

    pub fn timeline_entries(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().timeline.clone()
    }

    /// Position of the first timeline entry matching channel + status.
    pub fn timeline_index_of(&self, channel: &str, status: &str) -> Option<usize> {
        self.state
            .lock()
            .unwrap()
            .timeline
            .iter()
            .position(|(c, entry)| c == channel && entry["status"] == status)
    }
}

fn failing(state: &SharedBackendState, op: &str) -> bool {
    state.lock().unwrap().fail.contains(op)
}

async fn create_incident(
    State(state): State<SharedBackendState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if failing(&state, "incidents") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "incident store down").into_response();
    }
    state.lock().unwrap().incidents.push(body);
    Json(json!({ "incidentId": "INC-123" })).into_response()
}

async fn append_timeline_entry(
    State(state): State<SharedBackendState>,
    Path((_id, channel)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if failing(&state, "timeline") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "timeline store down").into_response();
    }
    state.lock().unwrap().timeline.push((channel, body));
    // Timeline writes return an empty body on success
    StatusCode::OK.into_response()
}

async fn set_root_cause(
    State(state): State<SharedBackendState>,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if failing(&state, "root-cause") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "root cause store down").into_response();
    }
    state.lock().unwrap().root_causes.push(body);
    StatusCode::OK.into_response()
}

async fn kb_search(
    State(state): State<SharedBackendState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if failing(&state, "kb") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "kb unavailable").into_response();
    }
    let query = params.get("query").cloned().unwrap_or_default();
    state.lock().unwrap().kb_queries.push(query);
    Json(json!({
        "references": [
            { "title": "Runbook: connection pools", "excerpt": "Restart the pooler and verify limits." }
        ]
    }))
    .into_response()
}

async fn create_plan(
    State(state): State<SharedBackendState>,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if failing(&state, "resolution-plan") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "plan store down").into_response();
    }
    state.lock().unwrap().plans.push(body);
    StatusCode::OK.into_response()
}

// ===== Mock inference service =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceMode {
    Ok,
    /// Return 200 but with content that is not valid JSON
    MalformedContent,
    /// Return 500
    Error,
}

#[derive(Debug)]
pub struct InferenceState {
    pub requests: Vec<Value>,
    pub mode: InferenceMode,
}

type SharedInferenceState = Arc<Mutex<InferenceState>>;

pub struct MockInference {
    pub addr: SocketAddr,
    pub state: SharedInferenceState,
}

impl MockInference {
    pub async fn start() -> Self {
        let state: SharedInferenceState = Arc::new(Mutex::new(InferenceState {
            requests: Vec::new(),
            mode: InferenceMode::Ok,
        }));

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn set_mode(&self, mode: InferenceMode) {
        self.state.lock().unwrap().mode = mode;
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

async fn chat_completions(
    State(state): State<SharedInferenceState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mode = {
        let mut guard = state.lock().unwrap();
        guard.requests.push(body.clone());
        guard.mode
    };

    match mode {
        InferenceMode::Error => {
            (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded").into_response()
        }
        InferenceMode::MalformedContent => {
            Json(completion_envelope("this is not json {{")).into_response()
        }
        InferenceMode::Ok => {
            let task = body
                .pointer("/response_format/json_schema/name")
                .and_then(Value::as_str)
                .unwrap_or_default();

            let content = match task {
                "triage" => json!({
                    "triage_title": "Database outage",
                    "triage_summary": "Connection pool exhausted on db",
                })
                .to_string(),
                _ => json!({
                    "confidence_score": 90,
                    "steps": [
                        {
                            "step_number": 1,
                            "procedure": "Restart the connection pooler",
                            "command": "systemctl restart pgbouncer"
                        },
                        {
                            "step_number": 2,
                            "procedure": "Verify active connections",
                            "command": "psql -c 'select count(*) from pg_stat_activity'"
                        }
                    ]
                })
                .to_string(),
            };

            Json(completion_envelope(&content)).into_response()
        }
    }
}

fn completion_envelope(content: &str) -> Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

// ===== Test helpers =====

pub fn build_pipeline(
    backend_url: &str,
    inference_url: &str,
    rca_delay: Duration,
) -> RemediationPipeline {
    let backend = Arc::new(
        BackendClient::new(&BackendConfig {
            base_url: backend_url.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap(),
    );
    let inference = Arc::new(
        InferenceClient::new(&InferenceConfig {
            base_url: inference_url.to_string(),
            model: "claude-3-5-haiku".to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        })
        .unwrap(),
    );

    let settings = PipelineSettings {
        rca_delay,
        default_assignee: "John Doe".to_string(),
        author: "triage_agent".to_string(),
    };

    RemediationPipeline::new(backend, inference, settings)
}

pub fn event(service: &str, trace_id: &str, message: &str) -> LogEvent {
    LogEvent {
        timestamp: "2026-08-30T10:00:00Z".to_string(),
        message: message.to_string(),
        level: "ERROR".to_string(),
        service: service.to_string(),
        trace_id: trace_id.to_string(),
    }
}

pub fn sample_batch() -> Vec<LogEvent> {
    vec![
        event("api", "t1", "upstream timeout calling db"),
        event("db", "t2", "FATAL: too many clients"),
        event("api", "t2", "request failed with 500"),
    ]
}

/// Poll until `predicate` holds or the timeout elapses.
pub async fn wait_for<F: Fn() -> bool>(predicate: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if predicate() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
