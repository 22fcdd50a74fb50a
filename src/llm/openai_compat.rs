// OpenAI-compatible chat-completions backend
// Works against any `/chat/completions` endpoint, including free proxy gateways
// that answer with a bare string instead of a completion object.

use crate::config::LLMConfig;
use crate::llm::provider::{CompletionBackend, CompletionError, CompletionReply};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

pub struct OpenAiCompatBackend {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl OpenAiCompatBackend {
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key,
        }
    }

    /// Backend whose HTTP client also enforces the per-attempt timeout.
    pub fn from_config(config: &LLMConfig) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompatBackend {
    async fn complete(&self, model: &str, prompt: &str) -> Result<CompletionReply, CompletionError> {
        let request = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(model, body_len = body.len(), "Completion response received");
        Ok(CompletionReply::from_body(&body))
    }
}
