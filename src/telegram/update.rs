//! Bot API update model
//!
//! Only the fields the bot routes on are modelled; everything else in the
//! payload is ignored. All identity fields are optional so that trimmed-down
//! payloads (for example `{"message": {"text": "..."}}`) still build.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: Option<i64>,
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Where replies go. Opaque to the bot logic; only the transport reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatRef {
    pub chat_id: Option<i64>,
}

/// What an update asks the bot to do.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Start,
    Text(&'a str),
    Document {
        document: &'a Document,
        caption: &'a str,
    },
    /// Nothing the bot handles (other commands, edits, service messages).
    Ignored,
}

impl Update {
    /// Build from a parsed payload. `None` when the payload does not describe an update.
    pub fn from_json(value: &Value) -> Option<Self> {
        serde_json::from_value::<Update>(value.clone())
            .ok()
            .filter(|update| update.update_id.is_some() || update.message.is_some())
    }

    pub fn chat(&self) -> ChatRef {
        ChatRef {
            chat_id: self
                .message
                .as_ref()
                .and_then(|m| m.chat.as_ref())
                .map(|c| c.id),
        }
    }

    pub fn event(&self) -> Event<'_> {
        let Some(message) = &self.message else {
            return Event::Ignored;
        };

        if let Some(document) = &message.document {
            return Event::Document {
                document,
                caption: message.caption.as_deref().unwrap_or_default(),
            };
        }

        match message.text.as_deref() {
            Some(text) if is_command(text, "start") => Event::Start,
            Some(text) if text.starts_with('/') => Event::Ignored,
            Some(text) if !text.is_empty() => Event::Text(text),
            _ => Event::Ignored,
        }
    }
}

/// `/name`, `/name@bot` or either followed by arguments.
fn is_command(text: &str, name: &str) -> bool {
    let head = text.split_whitespace().next().unwrap_or_default();
    let Some(command) = head.strip_prefix('/') else {
        return false;
    };
    command.split('@').next() == Some(name)
}
