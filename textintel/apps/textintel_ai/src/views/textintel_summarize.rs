use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use textintel_core::models::task::TaskType;
use textintel_core::views::textintel_errors::{bad, rejected, ApiResult};

use super::run_cached;
use crate::serializers::textintel_task::TaskOut;
use crate::tasks::TaskRequest;
use crate::AiState;

pub async fn summarize(
    State(state): State<AiState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<TaskOut>> {
    let Json(body) = payload.map_err(rejected)?;
    let req = TaskRequest::from_payload(TaskType::Summarize, body)
        .map_err(|e| bad(&e.to_string()))?;
    run_cached(&state, req).await
}
