use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atheris_llm::{ChatMessage, Role};

/// Lifecycle of an assistant reply
///
/// Transitions only move forward:
/// `Placeholder -> Streaming -> Complete | Failed`.
/// Not persisted; stored messages load as `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStatus {
    Placeholder,
    Streaming,
    #[default]
    Complete,
    Failed,
}

impl MessageStatus {
    /// Whether the message may still receive chunks
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Placeholder | Self::Streaming)
    }
}

/// One chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// `None` when reasoning was not requested, `Some("")` while it is still pending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(skip)]
    pub status: MessageStatus,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            reasoning: None,
            status: MessageStatus::Complete,
        }
    }

    /// Empty assistant message awaiting streamed content
    pub fn placeholder(wants_reasoning: bool) -> Self {
        Self {
            id: crate::new_id(),
            role: Role::Assistant,
            content: String::new(),
            timestamp: Utc::now(),
            reasoning: wants_reasoning.then(String::new),
            status: MessageStatus::Placeholder,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Apply one streamed delta
    ///
    /// Returns false (and changes nothing) once the message is closed.
    pub fn push_delta(&mut self, content: &str, reasoning: Option<&str>) -> bool {
        if !self.status.is_open() {
            return false;
        }

        self.content.push_str(content);
        if let Some(delta) = reasoning {
            self.reasoning.get_or_insert_with(String::new).push_str(delta);
        }
        self.status = MessageStatus::Streaming;
        true
    }

    /// Upstream form: role and content only
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}
