use axum::http::StatusCode;

/// GET /healthz - liveness check, empty body
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
