use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};

use crate::serializers::textintel_error::ApiError;

pub type ApiFailure = (StatusCode, Json<ApiError>);
pub type ApiResult<T> = Result<T, ApiFailure>;

pub fn bad(msg: &str) -> ApiFailure {
    (StatusCode::BAD_REQUEST, Json(ApiError { error: msg.into() }))
}

pub fn not_found(msg: &str) -> ApiFailure {
    (StatusCode::NOT_FOUND, Json(ApiError { error: msg.into() }))
}

/// Store or queue unreachable.
pub fn unavailable<E: std::fmt::Display>(e: E) -> ApiFailure {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ApiError { error: e.to_string() }),
    )
}

/// The model runtime failed or answered with something unusable.
pub fn bad_gateway<E: std::fmt::Display>(e: E) -> ApiFailure {
    (
        StatusCode::BAD_GATEWAY,
        Json(ApiError { error: e.to_string() }),
    )
}

/// Malformed body, wrong content type or schema mismatch; keeps the
/// extractor's status code.
pub fn rejected(rejection: JsonRejection) -> ApiFailure {
    (
        rejection.status(),
        Json(ApiError { error: rejection.body_text() }),
    )
}
