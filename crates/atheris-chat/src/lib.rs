//! Conversation state core of the Atheris chat client
//!
//! - [`ChatStore`] owns the conversation and folder registries, the current
//!   selection and the streaming flags. All of its operations are synchronous.
//! - [`ChatSession`] is the shared handle the rest of the application holds:
//!   it applies store mutations, writes them through to [`ChatRepository`]
//!   and publishes [`ChatEvent`]s.
//! - [`StreamingCoordinator`] runs one completion exchange at a time and
//!   relays streamed deltas into the session.
//!
//! [`ChatRepository`]: atheris_persist::ChatRepository
//! [`ChatEvent`]: atheris_types::ChatEvent

pub mod error;
pub mod events;
pub mod store;
mod registry;
mod folders;
pub mod session;
pub mod coordinator;
pub mod sidebar;

pub use error::ChatError;
pub use events::EventSink;
pub use store::{ChatStore, RegenerateTarget, StreamState, StreamTarget};
pub use session::ChatSession;
pub use coordinator::{CoordinatorConfig, ExchangeOutcome, StreamGuard, StreamingCoordinator};
pub use sidebar::{relative_day_label, FolderSection, SidebarView};
