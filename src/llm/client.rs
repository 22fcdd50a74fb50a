//! Completion client
//!
//! Wraps a [`CompletionBackend`] with the configured timeout and fixed-interval
//! retry. It never fails: once every attempt is spent, the failure itself is
//! returned as the analysis text.

use crate::config::LLMConfig;
use crate::llm::provider::CompletionBackend;
use crate::utils::{error_chain, with_retry, RetryPolicy};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Completer {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    policy: RetryPolicy,
}

impl Completer {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &LLMConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            policy: RetryPolicy {
                retries: config.retry_attempts,
                interval: config.retry_interval(),
                attempt_timeout: config.timeout(),
            },
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn complete(&self, prompt: &str) -> String {
        info!(model = %self.model, prompt_len = prompt.len(), "Requesting completion");

        let result = with_retry(self.policy, |attempt| async move {
            debug!(attempt, "Calling completion backend");
            self.backend.complete(&self.model, prompt).await?.into_text()
        })
        .await;

        match result {
            Ok(text) => {
                info!(response_len = text.len(), "Completion received");
                text
            }
            Err(exhausted) => {
                warn!(attempts = exhausted.attempts, error = %exhausted.last_error, "Completion attempts exhausted");
                format!("Не удалось получить ответ от LLM: {}", error_chain(&exhausted.last_error))
            }
        }
    }
}
