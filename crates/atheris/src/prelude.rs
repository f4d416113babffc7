//! Prelude module for convenient imports
//!
//! ```rust
//! use atheris::prelude::*;
//! ```

pub use crate::{
    ChatError, ChatEvent, ChatSession, ClientFactory, CompletionClient, Conversation,
    CoordinatorConfig, EventSink, ExchangeOutcome, Folder, Message, NoticeLevel, ProviderConfig,
    Role, SidebarView, StreamingCoordinator, UserSettings,
};
