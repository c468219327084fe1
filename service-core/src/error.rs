use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    /// Failure reported by an upstream dependency. The message is surfaced verbatim.
    #[error("{0}")]
    UpstreamError(String),

    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InternalError(_)
            | AppError::UpstreamError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            detail: String,
        }

        let status = self.status_code();

        let detail = match self {
            AppError::ValidationError(err) => err.to_string(),
            AppError::BadRequest(err) => err.to_string(),
            AppError::NotFound(err) => err.to_string(),
            AppError::PayloadTooLarge(msg) => msg,
            AppError::InternalError(err) => err.to_string(),
            AppError::UpstreamError(msg) => msg,
            AppError::GatewayTimeout(msg) => msg,
            AppError::ServiceUnavailable(msg) => msg,
            AppError::ConfigError(err) => format!("Configuration error: {}", err),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), detail = %detail, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), detail = %detail, "Request rejected");
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_error_is_500_with_verbatim_detail() {
        let res = AppError::UpstreamError("quota exceeded".to_string()).into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(body["detail"], "quota exceeded");
    }

    #[tokio::test]
    async fn bad_request_is_400() {
        let res = AppError::BadRequest(anyhow::anyhow!("question must not be blank")).into_response();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["detail"], "question must not be blank");
    }

    #[tokio::test]
    async fn payload_too_large_is_413() {
        let res = AppError::PayloadTooLarge("request body exceeds 1024 bytes".to_string())
            .into_response();

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = body_json(res).await;
        assert_eq!(body["detail"], "request body exceeds 1024 bytes");
    }

    #[test]
    fn timeouts_map_to_gateway_timeout() {
        assert_eq!(
            AppError::GatewayTimeout("slow".to_string()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
