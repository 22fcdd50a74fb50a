//! Update handlers: `/start`, plain text and documents.

use super::messages;
use crate::config::Config;
use crate::documents::{extract_text, ExtractError, RenderError, Rendered, ResponseRenderer};
use crate::llm::{CompletionBackend, Completer};
use crate::prompt::build_prompt;
use crate::telegram::{ChatError, ChatRef, ChatTransport, Document, Event, TextFormat, Update};
use crate::utils::error_chain;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("failed to reply to chat")]
    Reply(#[from] ChatError),

    #[error("failed to download document")]
    Download(#[source] ChatError),

    #[error("failed to extract document text")]
    Extract(#[from] ExtractError),

    #[error("failed to render analysis")]
    Render(#[from] RenderError),

    #[error("failed to create temporary file")]
    TempFile(#[source] std::io::Error),
}

/// Which handler took the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Start,
    Text,
    Document,
    Ignored,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Start => "start",
            Route::Text => "text",
            Route::Document => "document",
            Route::Ignored => "ignored",
        }
    }
}

/// Caption first, then the file text, separated by a blank line.
pub fn combine_caption(caption: &str, file_text: &str) -> String {
    if caption.is_empty() {
        file_text.to_string()
    } else {
        format!("{}\n\n{}", caption, file_text)
    }
}

pub struct Bot {
    chat: Arc<dyn ChatTransport>,
    completer: Completer,
    renderer: ResponseRenderer,
    max_file_size: u64,
}

impl Bot {
    pub fn new(config: &Config, chat: Arc<dyn ChatTransport>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            chat,
            completer: Completer::new(backend, &config.llm),
            renderer: ResponseRenderer::new(&config.limits, &config.render),
            max_file_size: config.limits.max_file_size,
        }
    }

    pub fn route(update: &Update) -> Route {
        match update.event() {
            Event::Start => Route::Start,
            Event::Text(_) => Route::Text,
            Event::Document { .. } => Route::Document,
            Event::Ignored => Route::Ignored,
        }
    }

    pub async fn handle(&self, update: &Update) -> Result<Route, HandlerError> {
        let chat = update.chat();
        match update.event() {
            Event::Start => {
                self.reply(&chat, messages::GREETING).await?;
                Ok(Route::Start)
            }
            Event::Text(text) => {
                self.handle_text(&chat, text).await?;
                Ok(Route::Text)
            }
            Event::Document { document, caption } => {
                self.handle_document(&chat, document, caption).await?;
                Ok(Route::Document)
            }
            Event::Ignored => {
                info!(update_id = ?update.update_id, "No handler for update");
                Ok(Route::Ignored)
            }
        }
    }

    async fn reply(&self, chat: &ChatRef, text: &str) -> Result<(), ChatError> {
        self.chat.send_text(chat, text, TextFormat::Plain).await
    }

    async fn handle_text(&self, chat: &ChatRef, text: &str) -> Result<(), HandlerError> {
        info!(text_len = text.len(), "Handling text submission");
        self.reply(chat, messages::CHECKING).await?;
        let analysis = self.completer.complete(&build_prompt(text)).await;
        self.send_analysis(chat, &analysis).await
    }

    /// Extraction, download and rendering failures end here as a fixed chat
    /// message; only failures to talk to the chat propagate.
    async fn handle_document(&self, chat: &ChatRef, document: &Document, caption: &str) -> Result<(), HandlerError> {
        info!(
            file_id = %document.file_id,
            file_size = ?document.file_size,
            mime_type = ?document.mime_type,
            "Handling document submission"
        );

        if let Some(size) = document.file_size {
            if size > self.max_file_size {
                warn!(size, limit = self.max_file_size, "Document rejected: too large");
                self.reply(chat, &messages::file_too_large(self.max_file_size)).await?;
                return Ok(());
            }
        }

        match self.process_document(chat, document, caption).await {
            Err(HandlerError::Reply(e)) => Err(HandlerError::Reply(e)),
            Err(e) => {
                warn!(error = %error_chain(&e), "Document processing failed");
                self.reply(chat, messages::FILE_ERROR).await?;
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    async fn process_document(&self, chat: &ChatRef, document: &Document, caption: &str) -> Result<(), HandlerError> {
        let suffix = document
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        // Removed when dropped, whichever way this function returns.
        let temp = tempfile::Builder::new()
            .prefix("normobot_")
            .suffix(&suffix)
            .tempfile()
            .map_err(HandlerError::TempFile)?;

        self.chat
            .download_file(&document.file_id, temp.path())
            .await
            .map_err(HandlerError::Download)?;

        let file_text = extract_text(temp.path(), document.mime_type.as_deref())?;
        info!(chars = file_text.chars().count(), "Extracted document text");

        let combined = combine_caption(caption, &file_text);
        self.reply(chat, messages::CHECKING).await?;
        let analysis = self.completer.complete(&build_prompt(&combined)).await;
        self.send_analysis(chat, &analysis).await
    }

    async fn send_analysis(&self, chat: &ChatRef, analysis: &str) -> Result<(), HandlerError> {
        match self.renderer.render(analysis)? {
            Rendered::Inline(text) => {
                self.chat.send_text(chat, &text, TextFormat::Markdown).await?;
            }
            Rendered::Document { bytes, pages } => {
                info!(pages, "Sending analysis as a document");
                self.reply(chat, &messages::sending_as_file(analysis.chars().count()))
                    .await?;
                self.chat
                    .send_document(chat, messages::ANALYSIS_FILE_NAME, bytes)
                    .await?;
            }
        }
        Ok(())
    }
}
