//! Shared handle over the chat store
//!
//! Every mutation runs under a short synchronous lock; the resulting state is
//! cloned out and written to the repository after the lock is released.
//! Writes are serialized so the last snapshot taken is the last one stored.
//! Storage failures are logged and never surface to callers.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use atheris_persist::ChatRepository;
use atheris_types::{ChatEvent, Conversation, Folder, Message, UserSettings};

use crate::error::{ChatError, Result};
use crate::events::EventSink;
use crate::sidebar::SidebarView;
use crate::store::{ChatStore, RegenerateTarget, StreamState, StreamTarget};

struct Inner {
    store: Mutex<ChatStore>,
    settings: Mutex<UserSettings>,
    repository: ChatRepository,
    events: EventSink,
    // Held from snapshot until the write completes
    write_lock: tokio::sync::Mutex<()>,
}

#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<Inner>,
}

impl ChatSession {
    /// Build a session from whatever the repository holds
    pub async fn load(repository: ChatRepository, events: EventSink) -> Self {
        let snapshot = repository.load().await;
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(ChatStore::from_parts(snapshot.conversations, snapshot.folders)),
                settings: Mutex::new(snapshot.settings),
                repository,
                events,
                write_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub async fn open_dir(dir: impl AsRef<Path>, events: EventSink) -> Result<Self> {
        let repository = ChatRepository::open_dir(dir).await?;
        Ok(Self::load(repository, events).await)
    }

    pub async fn in_memory(events: EventSink) -> Self {
        Self::load(ChatRepository::in_memory(), events).await
    }

    pub fn events(&self) -> &EventSink {
        &self.inner.events
    }

    pub fn repository(&self) -> &ChatRepository {
        &self.inner.repository
    }

    /// Run a read-only closure against the store
    pub fn read<R>(&self, f: impl FnOnce(&ChatStore) -> R) -> R {
        f(&self.inner.store.lock())
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut ChatStore) -> R) -> R {
        f(&mut self.inner.store.lock())
    }

    pub fn conversation(&self, id: &str) -> Option<Conversation> {
        self.read(|s| s.conversation(id).cloned())
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.read(|s| s.conversations().to_vec())
    }

    pub fn folders(&self) -> Vec<Folder> {
        self.read(|s| s.folders().to_vec())
    }

    pub fn current_conversation_id(&self) -> Option<String> {
        self.read(|s| s.current_conversation_id().map(str::to_string))
    }

    pub fn current_messages(&self) -> Vec<Message> {
        self.read(|s| s.current_messages().to_vec())
    }

    pub fn stream_state(&self) -> StreamState {
        self.read(|s| s.stream_state().clone())
    }

    pub fn sidebar(&self, search: &str) -> SidebarView {
        self.read(|s| SidebarView::build(s, search))
    }

    pub fn settings(&self) -> UserSettings {
        self.inner.settings.lock().clone()
    }

    pub async fn update_settings(&self, f: impl FnOnce(&mut UserSettings)) {
        let _write = self.inner.write_lock.lock().await;
        let settings = {
            let mut guard = self.inner.settings.lock();
            f(&mut guard);
            guard.clone()
        };
        if let Err(e) = self.inner.repository.save_settings(&settings).await {
            warn!(error = %e, "failed to save settings");
        }
    }

    // ---- conversations ----

    pub async fn create_conversation(&self) -> String {
        let id = self.mutate(|s| s.create_conversation());
        self.persist_conversations().await;
        id
    }

    pub fn select_conversation(&self, id: Option<&str>) -> bool {
        self.mutate(|s| s.select_conversation(id))
    }

    pub async fn delete_conversation(&self, id: &str) -> bool {
        let deleted = self.mutate(|s| s.delete_conversation(id));
        if deleted {
            self.persist_conversations().await;
            self.inner.events.success("Conversation deleted");
        }
        deleted
    }

    pub async fn delete_current_conversation(&self) -> Option<String> {
        let deleted = self.mutate(|s| s.delete_current_conversation());
        if deleted.is_some() {
            self.persist_conversations().await;
            self.inner.events.success("Conversation deleted");
        }
        deleted
    }

    pub async fn star_conversation(&self, id: &str, starred: bool) -> bool {
        let found = self.mutate(|s| s.star_conversation(id, starred));
        if found {
            self.persist_conversations().await;
            self.inner.events.success(if starred {
                "Conversation starred"
            } else {
                "Conversation unstarred"
            });
        }
        found
    }

    pub async fn update_conversation_title(&self, id: &str, title: &str) -> bool {
        let updated = self.mutate(|s| s.update_conversation_title(id, title));
        if updated {
            self.persist_conversations().await;
        }
        updated
    }

    pub async fn move_conversation_to_folder(&self, id: &str, folder_id: Option<&str>) -> bool {
        let moved = self.mutate(|s| s.move_conversation_to_folder(id, folder_id));
        if moved {
            self.persist_conversations().await;
            self.inner.events.success(if folder_id.is_some() {
                "Moved to folder"
            } else {
                "Removed from folder"
            });
        }
        moved
    }

    /// Append a user turn to the given conversation, or the current one
    ///
    /// With no usable conversation a new one is created and selected first.
    pub async fn append_user_message(&self, conversation_id: Option<&str>, content: &str) -> Result<(String, Message)> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let appended = self.mutate(|s| {
            let id = match conversation_id {
                Some(id) => id.to_string(),
                None => s.ensure_current_conversation(),
            };
            s.append_user_message(&id, content).map(|m| (id, m))
        });
        let appended = appended.ok_or_else(|| {
            ChatError::ConversationNotFound(conversation_id.unwrap_or_default().to_string())
        })?;

        self.persist_conversations().await;
        Ok(appended)
    }

    pub fn begin_assistant_message(&self, conversation_id: &str, wants_reasoning: bool) -> Result<String> {
        let message_id = self
            .mutate(|s| s.begin_assistant_message(conversation_id, wants_reasoning))
            .ok_or_else(|| ChatError::ConversationNotFound(conversation_id.to_string()))?;

        self.inner.events.emit(ChatEvent::MessageStarted {
            conversation_id: conversation_id.to_string(),
            message_id: message_id.clone(),
        });
        Ok(message_id)
    }

    /// Apply one streamed delta; not persisted until the message closes
    pub fn append_chunk(&self, conversation_id: &str, message_id: &str, content: &str, reasoning: Option<&str>) -> bool {
        let applied = self.mutate(|s| s.append_chunk(conversation_id, message_id, content, reasoning));
        if applied {
            self.inner.events.emit(ChatEvent::Chunk {
                conversation_id: conversation_id.to_string(),
                message_id: message_id.to_string(),
                content: content.to_string(),
                reasoning: reasoning.map(str::to_string),
            });
        } else {
            debug!(conversation_id, message_id, "dropped chunk for closed or missing message");
        }
        applied
    }

    pub async fn finalize_assistant_message(&self, conversation_id: &str, message_id: &str) -> bool {
        let finalized = self.mutate(|s| s.finalize_assistant_message(conversation_id, message_id));
        if finalized {
            self.persist_conversations().await;
            self.inner.events.emit(ChatEvent::MessageFinished {
                conversation_id: conversation_id.to_string(),
                message_id: message_id.to_string(),
            });
        }
        finalized
    }

    pub async fn fail_assistant_message(&self, conversation_id: &str, message_id: &str, error_text: &str) -> bool {
        let failed = self.mutate(|s| s.fail_assistant_message(conversation_id, message_id, error_text));
        if failed {
            self.persist_conversations().await;
            self.inner.events.emit(ChatEvent::MessageFailed {
                conversation_id: conversation_id.to_string(),
                message_id: message_id.to_string(),
                error: error_text.to_string(),
            });
        }
        failed
    }

    /// Validate a regenerate request and drop the target plus everything after it
    ///
    /// Emits an error notice and leaves state untouched when the message
    /// cannot be regenerated.
    pub async fn prepare_regenerate(&self, message_id: &str) -> Result<(String, RegenerateTarget)> {
        let prepared = self.mutate(|s| {
            let conversation_id = s
                .conversation_for_message(message_id)
                .map(|c| c.id.clone())
                .ok_or("message not found")?;
            let target = s.regeneration_target(&conversation_id, message_id)?;
            s.truncate_from(&conversation_id, message_id);
            Ok::<_, &'static str>((conversation_id, target))
        });

        match prepared {
            Ok(prepared) => {
                self.persist_conversations().await;
                self.inner.events.success("Regenerating response...");
                Ok(prepared)
            }
            Err(reason) => {
                self.inner.events.error("Cannot regenerate this message");
                Err(ChatError::CannotRegenerate {
                    message_id: message_id.to_string(),
                    reason,
                })
            }
        }
    }

    // ---- folders ----

    pub async fn create_folder(&self, name: &str) -> String {
        let id = self.mutate(|s| s.create_folder(name));
        self.persist_folders().await;
        self.inner.events.success("Folder created");
        id
    }

    pub async fn rename_folder(&self, id: &str, name: &str) -> bool {
        let renamed = self.mutate(|s| s.rename_folder(id, name));
        if renamed {
            self.persist_folders().await;
            self.inner.events.success("Folder renamed");
        }
        renamed
    }

    pub async fn delete_folder(&self, id: &str) -> bool {
        let deleted = self.mutate(|s| s.delete_folder(id));
        if deleted {
            // Members are written before the folder list
            self.persist_conversations().await;
            self.persist_folders().await;
            self.inner.events.success("Folder deleted");
        }
        deleted
    }

    pub async fn toggle_folder_expanded(&self, id: &str) -> Option<bool> {
        let expanded = self.mutate(|s| s.toggle_folder_expanded(id))?;
        self.persist_folders().await;
        Some(expanded)
    }

    // ---- exchange flags ----

    pub fn try_begin_exchange(&self) -> bool {
        let claimed = self.mutate(|s| s.try_begin_exchange());
        if claimed {
            self.emit_stream_state();
        }
        claimed
    }

    pub fn mark_streaming(&self, target: StreamTarget) {
        self.mutate(|s| s.mark_streaming(target));
        self.emit_stream_state();
    }

    pub fn end_exchange(&self) {
        self.mutate(|s| s.end_exchange());
        self.emit_stream_state();
    }

    fn emit_stream_state(&self) {
        let state = self.stream_state();
        self.inner.events.emit(ChatEvent::StreamStateChanged {
            is_loading: state.is_loading,
            is_streaming: state.is_streaming,
        });
    }

    // ---- persistence ----

    async fn persist_conversations(&self) {
        let _write = self.inner.write_lock.lock().await;
        let conversations = self.conversations();
        if let Err(e) = self.inner.repository.save_conversations(&conversations).await {
            warn!(error = %e, "failed to save conversations");
        }
    }

    async fn persist_folders(&self) {
        let _write = self.inner.write_lock.lock().await;
        let folders = self.folders();
        if let Err(e) = self.inner.repository.save_folders(&folders).await {
            warn!(error = %e, "failed to save folders");
        }
    }
}
