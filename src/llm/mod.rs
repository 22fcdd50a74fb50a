// LLM abstraction layer

pub mod client;
pub mod openai_compat;
pub mod provider;

pub use client::Completer;
pub use openai_compat::OpenAiCompatBackend;
pub use provider::*;
