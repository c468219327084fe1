//! Gemini AI provider implementation.
//!
//! Calls the `generateContent` REST method of Google's Generative Language API.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Header carrying the API key, keeps the credential out of request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub api_base: String,
    pub timeout: Duration,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the given model and method.
    fn api_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            model,
            method
        )
    }
}

fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// Turn a non-success HTTP response into a provider error, preferring the
/// message from Gemini's JSON error envelope.
async fn error_from_response(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);

    if status == 429 {
        ProviderError::RateLimited(message)
    } else {
        ProviderError::ApiError { status, message }
    }
}

fn parse_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        None | Some("STOP") => FinishReason::Complete,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
            FinishReason::ContentFilter
        }
        Some(_) => FinishReason::Other,
    }
}

/// Extract the answer text and usage from a decoded response.
fn into_provider_response(
    api_response: GenerateContentResponse,
) -> Result<ProviderResponse, ProviderError> {
    if api_response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_ref())
        .is_some()
    {
        return Err(ProviderError::ContentFiltered);
    }

    let candidate = api_response
        .candidates
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;

    let finish_reason = parse_finish_reason(candidate.finish_reason.as_deref());
    if finish_reason == FinishReason::ContentFilter {
        return Err(ProviderError::ContentFiltered);
    }

    // Thought parts are internal reasoning, not part of the answer.
    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought.unwrap_or(false))
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    let usage = api_response.usage_metadata.unwrap_or_default();

    Ok(ProviderResponse {
        text,
        input_tokens: usage.prompt_token_count.unwrap_or(0),
        output_tokens: usage.candidates_token_count.unwrap_or(0),
        finish_reason,
    })
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    thought: None,
                }],
            }],
        };

        let url = self.api_url(model, "generateContent");

        tracing::debug!(
            model = %model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        into_provider_response(api_response)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let url = format!("{}/models", self.config.api_base.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .query(&[("pageSize", "1")])
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Result<ProviderResponse, ProviderError> {
        into_provider_response(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn concatenates_text_parts_and_skips_thoughts() {
        let response = decode(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [
                        {"text": "thinking...", "thought": true},
                        {"text": "2+2 "},
                        {"text": "is 4."}
                    ]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
            }"#,
        )
        .unwrap();

        assert_eq!(response.text, "2+2 is 4.");
        assert_eq!(response.input_tokens, 12);
        assert_eq!(response.output_tokens, 5);
        assert_eq!(response.finish_reason, FinishReason::Complete);
    }

    #[test]
    fn safety_finish_is_content_filtered() {
        let err = decode(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap_err();
        assert_eq!(err, ProviderError::ContentFiltered);
    }

    #[test]
    fn blocked_prompt_is_content_filtered() {
        let err = decode(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap_err();
        assert_eq!(err, ProviderError::ContentFiltered);
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let err = decode(r#"{"candidates": []}"#).unwrap_err();
        assert_eq!(err, ProviderError::EmptyResponse);
    }

    #[test]
    fn max_tokens_keeps_partial_text() {
        let response = decode(
            r#"{"candidates": [{"content": {"parts": [{"text": "partial"}]}, "finishReason": "MAX_TOKENS"}]}"#,
        )
        .unwrap();
        assert_eq!(response.finish_reason, FinishReason::Length);
        assert_eq!(response.text, "partial");
    }

    #[test]
    fn request_serializes_to_gemini_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("hello".to_string()),
                    thought: None,
                }],
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let result = GeminiTextProvider::new(GeminiConfig {
            api_key: " ".to_string(),
            api_base: "http://localhost".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn api_url_joins_base_model_and_method() {
        let provider = GeminiTextProvider::new(GeminiConfig {
            api_key: "k".to_string(),
            api_base: "http://localhost:9/v1beta/".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(
            provider.api_url("gemini-2.5-flash", "generateContent"),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
