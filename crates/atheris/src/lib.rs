//! # Atheris
//!
//! Conversation core of a streaming chat client: conversation and folder
//! registries, local persistence and token-by-token assistant replies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atheris::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (events, mut rx) = EventSink::channel();
//!     let session = ChatSession::open_dir("./data", events).await?;
//!
//!     let client = ClientFactory::create_client(ProviderConfig::groq(
//!         std::env::var("GROQ_API_KEY")?,
//!     ))?;
//!     let coordinator = StreamingCoordinator::new(session.clone(), client);
//!
//!     tokio::spawn(async move {
//!         while let Some(event) = rx.recv().await {
//!             if let ChatEvent::Chunk { content, .. } = event {
//!                 print!("{}", content);
//!             }
//!         }
//!     });
//!
//!     coordinator.send_message("Hello!", false).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`atheris-llm`**: completion client trait, Groq and simulated providers
//! - **`atheris-types`**: messages, conversations, folders, settings, events
//! - **`atheris-persist`**: key-value storage and the typed chat repository
//! - **`atheris-chat`**: registries, session handle and streaming coordinator
//!
//! ## License
//!
//! MIT

pub mod prelude;

pub use atheris_chat::{
    relative_day_label, ChatError, ChatSession, ChatStore, CoordinatorConfig, EventSink,
    ExchangeOutcome, FolderSection, RegenerateTarget, SidebarView, StreamGuard, StreamState,
    StreamTarget, StreamingCoordinator,
};

pub use atheris_llm::{
    ChatMessage, ClientFactory, CompletionClient, CompletionOptions, CompletionRequest,
    CompletionResponse, CompletionStream, GroqClient, GroqConfig, ProviderConfig, ProviderType,
    Role, SimulatedClient, SimulatedConfig, StreamEvent, DEFAULT_MODEL, REASONING_MODEL,
};

pub use atheris_persist::{
    ChatRepository, FileStore, KeyValueStore, MemoryStore, PersistError, Snapshot,
};

pub use atheris_types::{
    derive_title, ChatEvent, ChatStyle, Conversation, Folder, FontSize, Message, MessageStatus,
    NoticeLevel, Theme, UserSettings, APOLOGY_MESSAGE, DEFAULT_TITLE,
};

/// Model catalog
pub mod models {
    pub use atheris_llm::models::*;
}
