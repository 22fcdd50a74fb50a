use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub llm: LLMConfig,
    pub limits: LimitsConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Clone, Deserialize)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &self.token.as_ref().map(|_| "<hidden>"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    pub retry_attempts: u32,
    pub retry_interval_secs: u64,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<hidden>"))
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Largest accepted document, in bytes.
    pub max_file_size: u64,
    /// Longest analysis delivered inline, in characters.
    pub max_message_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Directory holding `times.ttf` and `timesbd.ttf`.
    pub font_dir: PathBuf,
}

impl LLMConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8080,
                host: "0.0.0.0".to_string(),
            },
            telegram: TelegramConfig {
                token: None,
                api_base: "https://api.telegram.org".to_string(),
                timeout_secs: 60,
            },
            llm: LLMConfig {
                model: "gpt-4.1-mini".to_string(),
                api_base: "http://localhost:1337/v1".to_string(),
                api_key: None,
                retry_attempts: 3,
                retry_interval_secs: 5,
                timeout_secs: 120,
            },
            limits: LimitsConfig {
                max_file_size: 20 * 1024 * 1024,
                max_message_length: 4000,
            },
            render: RenderConfig {
                font_dir: PathBuf::from("fonts"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| defaults.server.port.to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or(defaults.server.host),
            },
            telegram: TelegramConfig {
                token: env::var("TELEGRAM_BOT_TOKEN")
                    .ok()
                    .filter(|t| !t.trim().is_empty()),
                api_base: env::var("TELEGRAM_API_BASE").unwrap_or(defaults.telegram.api_base),
                timeout_secs: env::var("TELEGRAM_TIMEOUT")
                    .unwrap_or_else(|_| defaults.telegram.timeout_secs.to_string())
                    .parse()?,
            },
            llm: LLMConfig {
                model: env::var("LLM_MODEL").unwrap_or(defaults.llm.model),
                api_base: env::var("LLM_API_BASE").unwrap_or(defaults.llm.api_base),
                api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
                retry_attempts: env::var("LLM_RETRY_ATTEMPTS")
                    .unwrap_or_else(|_| defaults.llm.retry_attempts.to_string())
                    .parse()?,
                retry_interval_secs: env::var("LLM_RETRY_INTERVAL")
                    .unwrap_or_else(|_| defaults.llm.retry_interval_secs.to_string())
                    .parse()?,
                timeout_secs: env::var("LLM_TIMEOUT")
                    .unwrap_or_else(|_| defaults.llm.timeout_secs.to_string())
                    .parse()?,
            },
            limits: LimitsConfig {
                max_file_size: env::var("MAX_FILE_SIZE")
                    .unwrap_or_else(|_| defaults.limits.max_file_size.to_string())
                    .parse()?,
                max_message_length: env::var("MAX_MESSAGE_LENGTH")
                    .unwrap_or_else(|_| defaults.limits.max_message_length.to_string())
                    .parse()?,
            },
            render: RenderConfig {
                font_dir: env::var("FONT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.render.font_dir),
            },
        })
    }
}
