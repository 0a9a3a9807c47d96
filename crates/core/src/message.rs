//! Conversation message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One turn in a session's history, as stored and returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message text in the language it was authored in
    pub text: String,
    /// True if the message came from the human
    #[serde(rename = "isUser")]
    pub is_user: bool,
    /// Authoring time
    pub timestamp: DateTime<Utc>,
    /// Language tag at time of authoring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, language: Option<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            timestamp: Utc::now(),
            language,
        }
    }

    pub fn bot(text: impl Into<String>, language: Option<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            timestamp: Utc::now(),
            language,
        }
    }
}

/// Role of a turn sent to the reasoning collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One turn of a reasoning-collaborator conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
