use crate::services::metrics;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use service_core::error::AppError;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "ask-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the generation provider must answer its health check.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.answer_service.provider().health_check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Provider health check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Prometheus scrape endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::get_metrics(),
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Not found"))
}
