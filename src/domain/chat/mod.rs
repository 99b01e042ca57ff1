//! Chat domain — thread messages and markdown export.

pub mod export;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use export::thread_to_markdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::System => "System",
        }
    }
}

/// One message of a chat thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Reasoning trace emitted before the answer, when the model exposes one.
    #[serde(default)]
    pub thinking: Option<String>,
    /// Model that produced an assistant message.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            thinking: None,
            model: None,
            created_at: None,
        }
    }

    pub fn assistant(content: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            thinking: None,
            model: model.map(str::to_string),
            created_at: None,
        }
    }
}
