use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::time::error::Elapsed;

/// Shown to the user when the backend answered with something that is neither
/// a chat-completion object nor plain text.
pub const UNRECOGNIZED_REPLY: &str = "Ответ LLM не распознан.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request timed out")]
    Timeout(#[from] Elapsed),

    #[error("completion request failed")]
    Http(#[from] reqwest::Error),

    #[error("completion backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response has an empty choices list")]
    NoChoices,

    #[error("completion backend error: {0}")]
    Backend(String),
}

/// What a completion backend handed back, classified at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionReply {
    /// Chat-completion object (`choices[0].message.content`).
    Structured(Value),
    /// Bare text answer.
    Text(String),
    Unrecognized,
}

impl CompletionReply {
    /// Classify a raw response body.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => CompletionReply::Structured(value),
            Ok(Value::String(text)) => CompletionReply::Text(text),
            Ok(_) => CompletionReply::Unrecognized,
            Err(_) => CompletionReply::Text(body.to_string()),
        }
    }

    /// Collapse to the answer text, trimmed.
    ///
    /// A structured reply without `choices` yields an empty answer; one whose
    /// `choices` list is empty (or not a list) is a failed attempt.
    pub fn into_text(self) -> Result<String, CompletionError> {
        let text = match self {
            CompletionReply::Structured(value) => match value.get("choices") {
                None => String::new(),
                Some(Value::Array(choices)) => {
                    let first = choices.first().ok_or(CompletionError::NoChoices)?;
                    first
                        .get("message")
                        .and_then(|m| m.get("content"))
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                }
                Some(_) => return Err(CompletionError::NoChoices),
            },
            CompletionReply::Text(text) => text,
            CompletionReply::Unrecognized => UNRECOGNIZED_REPLY.to_string(),
        };
        Ok(text.trim().to_string())
    }
}

/// Remote language-model service taking one user message.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<CompletionReply, CompletionError>;
}
