use crate::backend::BackendError;
use crate::event::LogEvent;
use crate::inference::{ResolutionPlan, TriageResult};
use crate::pipeline::{PlanError, RemediationPipeline, TriageError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for the triage API
pub struct AppState {
    pub pipeline: RemediationPipeline,
}

/// POST /api/v1/triage
///
/// Runs the synchronous prefix of the remediation workflow and responds with
/// the triage result; RCA completion and plan generation continue in the
/// background after this handler returns.
pub async fn triage_logs(
    State(state): State<Arc<AppState>>,
    Json(events): Json<Vec<LogEvent>>,
) -> Result<Json<TriageResult>, ApiError> {
    let result = state.pipeline.triage(events).await?;
    Ok(Json(result))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionPlanRequest {
    pub incident_id: String,
    pub triage_title: String,
    pub triage_summary: String,
    pub events: Vec<LogEvent>,
}

/// POST /api/v1/resolution-plan
///
/// Direct plan generation for an existing incident, bypassing triage and
/// incident creation. Synchronous: the caller gets the plan or the error.
pub async fn create_resolution_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResolutionPlanRequest>,
) -> Result<Json<ResolutionPlan>, ApiError> {
    let plan = state
        .pipeline
        .generate_resolution_plan(
            &request.incident_id,
            &request.triage_title,
            &request.triage_summary,
            &request.events,
        )
        .await?;
    Ok(Json(plan))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// Error handling
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Backend rejected a call; we propagate its status code and body.
    UpstreamStatus(u16, String),
    Internal(String),
}

impl From<TriageError> for ApiError {
    fn from(e: TriageError) -> Self {
        match e {
            TriageError::EmptyBatch => ApiError::BadRequest("no log events provided".to_string()),
            TriageError::Inference(_) => {
                ApiError::Internal("failed to analyze logs with AI".to_string())
            }
            TriageError::IncidentCreation(BackendError::Status { status, body }) => {
                ApiError::UpstreamStatus(status, format!("backend error: {}", body))
            }
            TriageError::IncidentCreation(e) => {
                ApiError::Internal(format!("failed to communicate with backend: {}", e))
            }
        }
    }
}

impl From<PlanError> for ApiError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Inference(_) => {
                ApiError::Internal("failed to generate resolution plan".to_string())
            }
            PlanError::Backend(BackendError::Status { status, body }) => {
                ApiError::UpstreamStatus(status, format!("backend error: {}", body))
            }
            PlanError::Backend(e) => {
                ApiError::Internal(format!("failed to communicate with backend: {}", e))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UpstreamStatus(code, msg) => (
                StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY),
                msg,
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
