pub mod textintel_jobs;
pub mod textintel_qa;
pub mod textintel_rewrite;
pub mod textintel_summarize;

use axum::Json;
use textintel_core::views::textintel_errors::{bad_gateway, ApiResult};
use tracing::info;

use crate::serializers::textintel_task::TaskOut;
use crate::tasks::TaskRequest;
use crate::AiState;

/// Answer from cache, or run the pipeline and cache its output.
pub(crate) async fn run_cached(state: &AiState, request: TaskRequest) -> ApiResult<Json<TaskOut>> {
    let task = request.task();
    let params = request.params();

    if let Some(result) = state.core.cache.get(task, &params).await {
        return Ok(Json(TaskOut { task: task.label().into(), cached: true, result }));
    }

    let result = request
        .execute(state.models.as_ref())
        .await
        .map_err(bad_gateway)?;
    info!(%task, "pipeline completed");
    state.core.cache.put(task, &params, &result).await;

    Ok(Json(TaskOut { task: task.label().into(), cached: false, result }))
}
