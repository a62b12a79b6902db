use axum::{routing::get, Router};

use crate::views::textintel_health::health;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
