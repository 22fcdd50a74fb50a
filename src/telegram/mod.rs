//! Telegram Bot API collaborator.
//!
//! The bot logic talks to Telegram only through [`ChatTransport`], so the
//! dispatcher can be driven by an in-memory transport in tests.

mod client;
mod update;

pub use client::TelegramClient;
pub use update::{Chat, ChatRef, Document, Event, Message, Update};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("telegram request failed")]
    Http(#[from] reqwest::Error),

    #[error("telegram {method} rejected: {description}")]
    Api { method: String, description: String },

    #[error("update carries no chat to reply to")]
    NoChat,

    #[error("telegram returned no download path for file {0}")]
    NoFilePath(String),

    #[error("failed to store downloaded file")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Markdown,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat: &ChatRef, text: &str, format: TextFormat) -> Result<(), ChatError>;

    async fn send_document(&self, chat: &ChatRef, file_name: &str, bytes: Vec<u8>) -> Result<(), ChatError>;

    /// Fetch the file behind `file_id` into `dest`.
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), ChatError>;
}
