//! Generation provider abstraction.
//!
//! The relay talks to the hosted model through [`TextProvider`], so the
//! Gemini client can be swapped for the in-memory mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use service_core::error::AppError;
use service_core::retry::Retryable;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError { .. } => "api_error",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::Timeout => "timeout",
            ProviderError::NetworkError(_) => "network",
        }
    }
}

impl Retryable for ProviderError {
    fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimited(_)
            | ProviderError::Timeout
            | ProviderError::NetworkError(_) => true,
            ProviderError::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout => AppError::GatewayTimeout(err.to_string()),
            ProviderError::NotConfigured(_) => AppError::ServiceUnavailable(err.to_string()),
            other => AppError::UpstreamError(other.to_string()),
        }
    }
}

/// Result of a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Generated text.
    pub text: String,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::ContentFilter => "content_filter",
            FinishReason::Other => "other",
        }
    }
}

/// A hosted model that turns a prompt into text.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Generate a text response from `model` for `prompt`.
    async fn generate(&self, model: &str, prompt: &str) -> Result<ProviderResponse, ProviderError>;

    /// Cheap check that the provider can serve requests.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
