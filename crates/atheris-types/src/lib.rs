pub mod message;
pub mod conversation;
pub mod folder;
pub mod settings;
pub mod events;
pub mod text;

pub use atheris_llm::Role;
pub use message::{Message, MessageStatus};
pub use conversation::Conversation;
pub use folder::Folder;
pub use settings::{ChatStyle, FontSize, Theme, UserSettings};
pub use events::{ChatEvent, NoticeLevel};
pub use text::{derive_title, APOLOGY_MESSAGE, DEFAULT_TITLE};

/// Fresh globally-unique identifier for messages, conversations and folders
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
