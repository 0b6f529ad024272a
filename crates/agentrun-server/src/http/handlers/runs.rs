//! Run submission and status handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use agentrun_core::{CoreError, RunId};

use crate::http::responses::{ApiError, RunStatusResponse, SubmitRunRequest, SubmitRunResponse};
use crate::scheduler::Scheduler;
use crate::state::AppState;

/// POST /agents/run - Admit a run and start it in the background.
pub async fn submit_run(
    State(state): State<Arc<AppState>>,
    json_result: Result<Json<SubmitRunRequest>, JsonRejection>,
) -> Response {
    let req = match json_result {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection, "Invalid run request");
            return ApiError::Validation {
                message: rejection.body_text(),
            }
            .into_response();
        }
    };

    match Scheduler::new(state).submit(req.agent_type, req.user_id).await {
        Ok(ticket) => (
            StatusCode::ACCEPTED,
            Json(SubmitRunResponse {
                run_id: ticket.run_id(),
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET /agents/status/:run_id - Current state of a run.
pub async fn get_run_status(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
) -> Result<Json<RunStatusResponse>, ApiError> {
    let run_id: RunId = run_id.parse().map_err(|e: CoreError| ApiError::Validation {
        message: e.to_string(),
    })?;

    match state.registry.get(&run_id).await {
        Ok(record) => Ok(Json(record.into())),
        Err(CoreError::RunNotFound(_)) => {
            debug!(run_id = %run_id, "Status requested for unknown run");
            Err(ApiError::NotFound)
        }
        Err(e) => Err(ApiError::Internal {
            message: e.to_string(),
        }),
    }
}
