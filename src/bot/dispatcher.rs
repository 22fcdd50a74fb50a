//! Update dispatcher
//!
//! Entry point for one webhook invocation: locate and decode the body, parse
//! it, build the update, hand it to the bot and map the outcome to a transport
//! response. Every step is recorded in a [`DiagnosticTrace`] that is returned
//! in the body of an error response.

use super::handlers::{Bot, HandlerError};
use super::trace::{preview, DiagnosticTrace, Stage};
use crate::config::Config;
use crate::llm::{CompletionBackend, OpenAiCompatBackend};
use crate::telegram::{ChatTransport, TelegramClient, Update};
use crate::types::{Envelope, TransportResponse};
use crate::utils::error_chain;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Telegram bot token is not configured")]
    MissingToken,

    #[error("request body is missing or empty")]
    MissingBody,

    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("payload is not a non-empty JSON object: {0}")]
    InvalidPayload(String),

    #[error("payload does not describe a Telegram update: {0}")]
    InvalidUpdate(String),

    #[error("update handling failed")]
    Handler(#[from] HandlerError),
}

pub struct Dispatcher {
    bot: Option<Bot>,
}

impl Dispatcher {
    /// Dispatcher over explicit collaborators. Without a configured token every
    /// invocation fails with [`DispatchError::MissingToken`].
    pub fn new(config: &Config, chat: Arc<dyn ChatTransport>, backend: Arc<dyn CompletionBackend>) -> Self {
        let bot = config
            .telegram
            .token
            .as_ref()
            .map(|_| Bot::new(config, chat, backend));
        Self { bot }
    }

    /// Dispatcher talking to the Telegram Bot API and the configured completion endpoint.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let bot = match &config.telegram.token {
            Some(token) => {
                let chat = TelegramClient::new(token.clone(), config.telegram.api_base.clone(), config.telegram.timeout())?;
                let backend = OpenAiCompatBackend::from_config(&config.llm)?;
                Some(Bot::new(config, Arc::new(chat), Arc::new(backend)))
            }
            None => None,
        };
        Ok(Self { bot })
    }

    pub async fn dispatch(&self, envelope: &Envelope) -> TransportResponse {
        let mut trace = DiagnosticTrace::new();

        match self.run(envelope, &mut trace).await {
            Ok(()) => {
                trace.record(Stage::Completed, "response: 200 OK");
                info!(steps = trace.len(), "Update processed");
                TransportResponse::ok()
            }
            Err(err) => {
                let detail = error_chain(&err);
                error!(error = %detail, stage = %trace.stage(), "Update dispatch failed");
                trace.record(Stage::Failed, format!("error: {}", err));
                TransportResponse::error(format!(
                    "Error: {}\nDetail:\n{}\n\nSteps:\n{}",
                    err, detail, trace
                ))
            }
        }
    }

    async fn run(&self, envelope: &Envelope, trace: &mut DiagnosticTrace) -> Result<(), DispatchError> {
        trace.record(
            Stage::Start,
            format!("envelope received with {} field(s)", envelope.fields().len()),
        );

        let bot = self.bot.as_ref().ok_or(DispatchError::MissingToken)?;
        trace.record(Stage::Start, "bot token present: <hidden>");

        let raw = envelope.body().ok_or(DispatchError::MissingBody)?;
        trace.record(
            Stage::EnvelopeValidated,
            format!("body located: {} ({} bytes)", raw.kind(), raw.len()),
        );

        let body = raw.into_text();
        if body.trim().is_empty() {
            return Err(DispatchError::MissingBody);
        }
        trace.record(Stage::BodyDecoded, format!("body decoded: '{}'", preview(&body, PREVIEW_CHARS)));

        let payload: Value = serde_json::from_str(&body).map_err(DispatchError::InvalidJson)?;
        trace.record(Stage::JsonParsed, "JSON parsed");

        match &payload {
            Value::Object(map) if !map.is_empty() => {}
            other => return Err(DispatchError::InvalidPayload(preview(&other.to_string(), PREVIEW_CHARS))),
        }
        trace.record(Stage::JsonParsed, "payload is a non-empty object");

        let update = Update::from_json(&payload)
            .ok_or_else(|| DispatchError::InvalidUpdate(preview(&payload.to_string(), PREVIEW_CHARS)))?;
        trace.record(
            Stage::UpdateBuilt,
            format!("update built: update_id={:?}, chat={:?}", update.update_id, update.chat().chat_id),
        );

        trace.record(Stage::Routed, format!("routed to {} handler", Bot::route(&update).as_str()));
        let route = bot.handle(&update).await?;
        trace.record(Stage::Routed, format!("{} handler finished", route.as_str()));

        Ok(())
    }
}
