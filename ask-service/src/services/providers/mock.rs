//! Mock provider implementation for testing.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A call observed by [`MockTextProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub model: String,
    pub prompt: String,
}

/// Mock text provider for testing.
///
/// Replays scripted outcomes in order; once the script runs out it echoes the
/// prompt back. Every call is recorded.
pub struct MockTextProvider {
    enabled: bool,
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that returns `outcomes` for successive calls.
    pub fn scripted<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<String, ProviderError>>,
    {
        Self {
            enabled: true,
            script: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                model: model.to_string(),
                prompt: prompt.to_string(),
            });
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let text = match next {
            Some(outcome) => outcome?,
            None => format!("Mock response for: {}", prompt),
        };

        Ok(ProviderResponse {
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: text.len() as i32 / 4,
            text,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }
}
