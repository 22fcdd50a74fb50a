//! In-memory collaborators for driving the bot without network access.

use crate::llm::{CompletionBackend, CompletionError, CompletionReply};
use crate::telegram::{ChatError, ChatRef, ChatTransport, TextFormat};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SentText {
    pub chat: ChatRef,
    pub text: String,
    pub format: TextFormat,
}

/// One outbound chat call, in the order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(SentText),
    Document { file_name: String, bytes: Vec<u8> },
}

#[derive(Default)]
pub struct RecordingChat {
    pub sent: Mutex<Vec<Sent>>,
    pub downloads: Mutex<Vec<(String, PathBuf)>>,
    /// Content written by `download_file`; `None` makes downloads fail.
    pub file_content: Option<Vec<u8>>,
    pub fail_sends: bool,
}

impl RecordingChat {
    pub fn with_file(content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn sent_texts(&self) -> Vec<SentText> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Text(text) => Some(text),
                Sent::Document { .. } => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent_texts().into_iter().map(|t| t.text).collect()
    }

    pub fn last_text(&self) -> Option<SentText> {
        self.sent_texts().pop()
    }

    pub fn download_count(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for RecordingChat {
    async fn send_text(&self, chat: &ChatRef, text: &str, format: TextFormat) -> Result<(), ChatError> {
        if self.fail_sends {
            return Err(ChatError::Api {
                method: "sendMessage".to_string(),
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        self.sent.lock().unwrap().push(Sent::Text(SentText {
            chat: *chat,
            text: text.to_string(),
            format,
        }));
        Ok(())
    }

    async fn send_document(&self, _chat: &ChatRef, file_name: &str, bytes: Vec<u8>) -> Result<(), ChatError> {
        self.sent.lock().unwrap().push(Sent::Document {
            file_name: file_name.to_string(),
            bytes,
        });
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), ChatError> {
        self.downloads
            .lock()
            .unwrap()
            .push((file_id.to_string(), dest.to_path_buf()));
        match &self.file_content {
            Some(content) => {
                std::fs::write(dest, content)?;
                Ok(())
            }
            None => Err(ChatError::NoFilePath(file_id.to_string())),
        }
    }
}

/// Answers every prompt with the same text and remembers the prompts.
pub struct FixedBackend {
    pub answer: String,
    pub prompts: Mutex<Vec<String>>,
}

impl FixedBackend {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionBackend for FixedBackend {
    async fn complete(&self, _model: &str, prompt: &str) -> Result<CompletionReply, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(CompletionReply::Text(self.answer.clone()))
    }
}
