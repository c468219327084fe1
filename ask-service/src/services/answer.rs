//! Question answering with summary rotation.
//!
//! One invocation makes up to two sequential provider calls: the answer, then
//! the rewrite of the running summary. Nothing is kept between invocations.

use crate::config::AskConfig;
use crate::dtos::AskRequest;
use crate::models::Message;
use crate::services::context::{build_context, build_summary_prompt};
use crate::services::metrics;
use crate::services::providers::{ProviderError, ProviderResponse, TextProvider};
use service_core::error::AppError;
use service_core::retry::{retry_call, RetryConfig};
use std::sync::Arc;
use std::time::Instant;

/// Answer plus the summary to send back with the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct AnswerSettings {
    pub answer_model: String,
    pub summary_model: String,
    pub summary_enabled: bool,
    pub max_recent_messages: usize,
    pub retry: RetryConfig,
}

impl AnswerSettings {
    pub fn from_config(config: &AskConfig) -> Self {
        Self {
            answer_model: config.models.answer_model.clone(),
            summary_model: config.models.summary_model.clone(),
            summary_enabled: config.conversation.summary_enabled,
            max_recent_messages: config.conversation.max_recent_messages,
            retry: RetryConfig::with_max_retries(config.upstream.max_retries),
        }
    }
}

#[derive(Clone)]
pub struct AnswerService {
    provider: Arc<dyn TextProvider>,
    settings: AnswerSettings,
}

impl AnswerService {
    pub fn new(provider: Arc<dyn TextProvider>, settings: AnswerSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    /// Answer a validated request.
    ///
    /// Fails only when the answer call fails. A failed summary refresh falls
    /// back to the summary the caller sent.
    #[tracing::instrument(
        skip_all,
        fields(
            question_len = request.question.len(),
            message_count = request.recent_messages.len(),
            page_content_len = request.page_content.len(),
        )
    )]
    pub async fn answer(&self, request: &AskRequest) -> Result<Answer, AppError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "question must not be empty"
            )));
        }

        let recent = self.recent_tail(&request.recent_messages);

        let context = build_context(&request.summary, recent, question, &request.page_content);
        let response = self
            .generate("answer", &self.settings.answer_model, &context)
            .await?;
        let answer = response.text;

        let summary = if self.settings.summary_enabled {
            self.refresh_summary(&request.summary, recent, question, &answer)
                .await
        } else {
            request.summary.clone()
        };

        tracing::info!(
            answer_len = answer.len(),
            summary_len = summary.len(),
            "Answer produced"
        );

        Ok(Answer { answer, summary })
    }

    /// Ask the model for a new summary, keeping the old one on failure.
    async fn refresh_summary(
        &self,
        previous_summary: &str,
        recent: &[Message],
        question: &str,
        answer: &str,
    ) -> String {
        let prompt = build_summary_prompt(previous_summary, recent, question, answer);

        match self
            .generate("summary", &self.settings.summary_model, &prompt)
            .await
        {
            // Only leading and trailing whitespace is stripped. Everything in
            // between is stored exactly as the model wrote it.
            Ok(response) => response.text.trim().to_string(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Summary refresh failed, keeping previous summary"
                );
                metrics::record_summary_fallback();
                previous_summary.to_string()
            }
        }
    }

    /// One provider call with retry, timing and token accounting.
    async fn generate(
        &self,
        call: &'static str,
        model: &str,
        prompt: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let provider_name = self.provider.name();
        let started = Instant::now();

        let result = retry_call(&self.settings.retry, call, || {
            self.provider.generate(model, prompt)
        })
        .await;

        metrics::record_provider_latency(
            provider_name,
            model,
            call,
            started.elapsed().as_secs_f64(),
        );

        match &result {
            Ok(response) => {
                metrics::record_tokens(model, response.input_tokens, response.output_tokens);
                tracing::debug!(
                    call,
                    model = %model,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    finish_reason = response.finish_reason.as_str(),
                    "Provider call completed"
                );
            }
            Err(e) => {
                metrics::record_provider_error(provider_name, e.kind());
            }
        }

        result
    }

    /// The most recent messages, at most `max_recent_messages` of them.
    fn recent_tail<'a>(&self, messages: &'a [Message]) -> &'a [Message] {
        let keep = self.settings.max_recent_messages;
        if messages.len() > keep {
            tracing::debug!(
                dropped = messages.len() - keep,
                "Truncating recent messages to the configured limit"
            );
            &messages[messages.len() - keep..]
        } else {
            messages
        }
    }
}
