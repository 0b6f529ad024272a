//! HTTP request and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use agentrun_core::{AgentType, RunId, RunRecord, RunState, UserId};

use crate::scheduler::SchedulerError;

// ============================================================================
// Run types
// ============================================================================

/// Request body for submitting a run.
#[derive(Debug, Deserialize)]
pub struct SubmitRunRequest {
    pub agent_type: AgentType,
    pub user_id: UserId,
}

/// Response body for an accepted run.
#[derive(Debug, Serialize)]
pub struct SubmitRunResponse {
    pub run_id: RunId,
}

/// Status of a single run.
#[derive(Debug, Serialize)]
pub struct RunStatusResponse {
    pub run_id: RunId,
    pub state: RunState,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl From<RunRecord> for RunStatusResponse {
    fn from(record: RunRecord) -> Self {
        Self {
            run_id: record.run_id,
            state: record.state,
            result: record.result,
            error: record.error,
        }
    }
}

// ============================================================================
// Health types
// ============================================================================

/// Response for the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub busy: bool,
    pub runs: usize,
}

// ============================================================================
// Error types
// ============================================================================

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API errors with their HTTP status codes.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or unknown request fields.
    Validation { message: String },
    /// Another run holds the admission gate.
    Busy,
    /// Unknown run id.
    NotFound,
    /// Internal server error.
    Internal { message: String },
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::Busy => ApiError::Busy,
            SchedulerError::Registry(e) => ApiError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Busy => (
                StatusCode::CONFLICT,
                SchedulerError::Busy.to_string(),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Run ID not found".to_string()),
            ApiError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
