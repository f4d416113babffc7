use thiserror::Error;

use atheris_persist::PersistError;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Cannot regenerate message {message_id}: {reason}")]
    CannotRegenerate {
        message_id: String,
        reason: &'static str,
    },

    #[error("A response is already being generated")]
    ExchangeInProgress,

    #[error("Storage error: {0}")]
    Persist(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
