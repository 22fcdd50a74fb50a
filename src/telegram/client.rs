//! Telegram Bot API client: sendMessage, sendDocument, getFile and file download.

use super::{ChatError, ChatRef, ChatTransport, TextFormat};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    #[serde(default)]
    file_path: Option<String>,
}

pub struct TelegramClient {
    token: String,
    api_base: String,
    client: Client,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>, api_base: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_base, self.token, file_path)
    }

    async fn read_response<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> Result<Option<T>, ChatError> {
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(parsed) if parsed.ok => Ok(parsed.result),
            Ok(parsed) => Err(ChatError::Api {
                method: method.to_string(),
                description: parsed
                    .description
                    .unwrap_or_else(|| format!("ok: false (HTTP {})", status)),
            }),
            Err(_) => Err(ChatError::Api {
                method: method.to_string(),
                description: format!("HTTP {}: {}", status, body),
            }),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<Option<T>, ChatError> {
        let response = self.client.post(self.method_url(method)).json(body).send().await?;
        Self::read_response(method, response).await
    }
}

fn chat_id(chat: &ChatRef) -> Result<i64, ChatError> {
    chat.chat_id.ok_or(ChatError::NoChat)
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_text(&self, chat: &ChatRef, text: &str, format: TextFormat) -> Result<(), ChatError> {
        let mut body = serde_json::json!({ "chat_id": chat_id(chat)?, "text": text });
        if format == TextFormat::Markdown {
            body["parse_mode"] = serde_json::Value::String("Markdown".to_string());
        }
        self.call::<serde_json::Value>("sendMessage", &body).await?;
        debug!(text_len = text.len(), "sendMessage delivered");
        Ok(())
    }

    async fn send_document(&self, chat: &ChatRef, file_name: &str, bytes: Vec<u8>) -> Result<(), ChatError> {
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .text("chat_id", chat_id(chat)?.to_string())
            .part("document", part);

        let response = self
            .client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;
        Self::read_response::<serde_json::Value>("sendDocument", response).await?;
        info!(file_name, size, "sendDocument delivered");
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), ChatError> {
        let info: Option<FileInfo> = self
            .call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await?;
        let file_path = info
            .and_then(|i| i.file_path)
            .ok_or_else(|| ChatError::NoFilePath(file_id.to_string()))?;

        let response = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;

        info!(file_id, size = bytes.len(), "Downloaded file");
        Ok(())
    }
}
