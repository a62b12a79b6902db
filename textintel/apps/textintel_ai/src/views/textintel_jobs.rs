use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use textintel_core::models::{job::JobStatus, task::TaskType};
use textintel_core::views::textintel_errors::{bad, not_found, rejected, unavailable, ApiResult};
use tracing::info;

use crate::serializers::textintel_jobs::{ResultOut, StatusOut, SubmitOut};
use crate::tasks::TaskRequest;
use crate::AiState;

pub async fn submit(
    State(state): State<AiState>,
    Path(task_type): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmitOut>)> {
    let task = task_type
        .parse::<TaskType>()
        .map_err(|e| bad(&e.to_string()))?;
    let Json(body) = payload.map_err(rejected)?;
    let req = TaskRequest::from_payload(task, body).map_err(|e| bad(&e.to_string()))?;

    // fail loud: a job that cannot be queued is an error for the caller
    let job_id = state
        .core
        .jobs
        .submit(task, req.params())
        .await
        .map_err(unavailable)?;
    info!(%job_id, %task, "job submitted");

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitOut { job_id, status: JobStatus::Queued }),
    ))
}

pub async fn status(
    State(state): State<AiState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<StatusOut>> {
    let status = state.core.jobs.status(&job_id).await.map_err(unavailable)?;
    let status = status.map_or("unknown", JobStatus::as_str).to_string();
    Ok(Json(StatusOut { job_id, status }))
}

pub async fn result(
    State(state): State<AiState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<ResultOut>> {
    let Some(record) = state.core.jobs.record(&job_id).await.map_err(unavailable)? else {
        return Err(not_found("Job not found"));
    };
    Ok(Json(ResultOut {
        job_id,
        status: record.status,
        result: record.result,
        error: record.error,
    }))
}
