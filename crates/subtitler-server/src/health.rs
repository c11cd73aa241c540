use axum::response::IntoResponse;
use http::StatusCode;

pub(crate) const LIVENESS_MESSAGE: &str = "Subtitle Generator Backend is running";

/// Liveness probe handler
pub(crate) async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, LIVENESS_MESSAGE)
}
