use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::serializers::textintel_health::HealthOut;
use crate::AppState;

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthOut>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthOut { ok: true, redis: true, error: None }),
        ),
        Err(err) => {
            warn!(error = %err, "health check: store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthOut { ok: false, redis: false, error: Some(err.to_string()) }),
            )
        }
    }
}
