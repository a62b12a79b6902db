use axum::{
    routing::{get, post},
    Router,
};

use crate::views::{
    textintel_jobs as jobs, textintel_qa::qa, textintel_rewrite::rewrite,
    textintel_summarize::summarize,
};
use crate::AiState;

pub fn router() -> Router<AiState> {
    Router::new()
        .route("/summarize", post(summarize))
        .route("/qa", post(qa))
        .route("/rewrite", post(rewrite))
        .route("/submit/{task_type}", post(jobs::submit))
        .route("/status/{job_id}", get(jobs::status))
        .route("/result/{job_id}", get(jobs::result))
}
