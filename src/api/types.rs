//! Wire types shared by the chat service client and the session layer
//!
//! These mirror the JSON returned by the backend. Fields the client does not
//! interpret are kept in `metadata` so they survive a round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A conversation thread as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Opaque identifier assigned by the backend
    pub chat_id: String,
    /// Display title; renamed by the backend after the first exchange
    pub title: String,
    /// Creation time, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Any other fields the backend attaches
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Chat {
    /// Creates a chat with no extra metadata
    ///
    /// # Examples
    ///
    /// ```
    /// use chatshell::api::Chat;
    ///
    /// let chat = Chat::new("a", "New Chat");
    /// assert_eq!(chat.chat_id, "a");
    /// ```
    pub fn new(chat_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            title: title.into(),
            created_at: None,
            metadata: serde_json::Map::new(),
        }
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn in a chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub msg_id: String,
    pub chat_id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    /// Creates a message with no extra metadata
    pub fn new(
        msg_id: impl Into<String>,
        chat_id: impl Into<String>,
        role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            msg_id: msg_id.into(),
            chat_id: chat_id.into(),
            role,
            content: content.into(),
            created_at: None,
            metadata: serde_json::Map::new(),
        }
    }
}

/// Which backend model answers subsequent messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub name: String,
    pub provider: String,
}

impl ModelSelection {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
        }
    }

    /// Parses `provider/name`, e.g. `openai/gpt-4.1`
    ///
    /// The name may itself contain `/`; only the first separator splits.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatshell::api::ModelSelection;
    ///
    /// let model = ModelSelection::parse("ollama/llama3.2:latest").unwrap();
    /// assert_eq!(model.provider, "ollama");
    /// assert_eq!(model.name, "llama3.2:latest");
    /// assert!(ModelSelection::parse("gpt-4.1").is_none());
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let (provider, name) = value.trim().split_once('/')?;
        if provider.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(name, provider))
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::new("gpt-4.1", "openai")
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.name)
    }
}

/// Result of a successful send: the stored user turn and the model's reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub user_message: Message,
    pub ai_message: Message,
    /// Present only when the backend renamed the chat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_chat: Option<Chat>,
}
