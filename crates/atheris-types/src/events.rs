use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Updates pushed from the chat core to whatever renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Transient user-facing notice (toast)
    Notice {
        level: NoticeLevel,
        message: String,
    },

    /// Placeholder assistant message appended
    MessageStarted {
        conversation_id: String,
        message_id: String,
    },

    /// Delta applied to the streaming target
    Chunk {
        conversation_id: String,
        message_id: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reasoning: Option<String>,
    },

    MessageFinished {
        conversation_id: String,
        message_id: String,
    },

    MessageFailed {
        conversation_id: String,
        message_id: String,
        error: String,
    },

    StreamStateChanged {
        is_loading: bool,
        is_streaming: bool,
    },
}

impl ChatEvent {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error_notice(&self) -> bool {
        matches!(self, Self::Notice { level: NoticeLevel::Error, .. })
    }
}
