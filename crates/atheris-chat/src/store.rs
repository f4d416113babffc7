use std::cmp::Reverse;

use atheris_llm::ChatMessage;
use atheris_types::{Conversation, Folder, Message};

/// The assistant message currently receiving deltas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTarget {
    pub conversation_id: String,
    pub message_id: String,
}

/// Global exchange flags read by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    pub is_loading: bool,
    pub is_streaming: bool,
    pub target: Option<StreamTarget>,
}

impl StreamState {
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_streaming
    }
}

/// What a regenerate request resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerateTarget {
    pub user_content: String,
    pub use_reasoning: bool,
}

/// In-memory registries plus the current selection
///
/// `conversations` is kept newest-first by insertion; recency views sort by
/// `updated_at` with a stable sort, so equal timestamps keep insertion order.
#[derive(Debug, Default)]
pub struct ChatStore {
    pub(crate) conversations: Vec<Conversation>,
    pub(crate) folders: Vec<Folder>,
    pub(crate) current_conversation_id: Option<String>,
    pub(crate) stream: StreamState,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store initialised from persisted state, with nothing selected
    pub fn from_parts(conversations: Vec<Conversation>, folders: Vec<Folder>) -> Self {
        Self {
            conversations,
            folders,
            current_conversation_id: None,
            stream: StreamState::default(),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub(crate) fn conversation_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub(crate) fn folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    /// All conversations, most recently updated first
    pub fn conversations_by_recency(&self) -> Vec<&Conversation> {
        let mut sorted: Vec<&Conversation> = self.conversations.iter().collect();
        sorted.sort_by_key(|c| Reverse(c.updated_at));
        sorted
    }

    pub fn current_conversation_id(&self) -> Option<&str> {
        self.current_conversation_id.as_deref()
    }

    pub fn current_conversation(&self) -> Option<&Conversation> {
        self.current_conversation_id
            .as_deref()
            .and_then(|id| self.conversation(id))
    }

    /// The visible message list: messages of the selected conversation
    pub fn current_messages(&self) -> &[Message] {
        self.current_conversation()
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn stream_state(&self) -> &StreamState {
        &self.stream
    }

    /// Upstream history for a conversation, omitting the streaming target
    pub fn history_for_request(&self, conversation_id: &str, exclude_message_id: &str) -> Vec<ChatMessage> {
        self.conversation(conversation_id)
            .map(|c| {
                c.messages
                    .iter()
                    .filter(|m| m.id != exclude_message_id)
                    .map(Message::to_chat_message)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Claim the single exchange slot
    ///
    /// Returns false if an exchange is already loading or streaming.
    pub fn try_begin_exchange(&mut self) -> bool {
        if self.stream.is_busy() {
            return false;
        }
        self.stream.is_loading = true;
        true
    }

    pub fn mark_streaming(&mut self, target: StreamTarget) {
        self.stream.is_loading = false;
        self.stream.is_streaming = true;
        self.stream.target = Some(target);
    }

    pub fn end_exchange(&mut self) {
        self.stream = StreamState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atheris_llm::Role;

    #[test]
    fn test_exchange_slot_is_exclusive() {
        let mut store = ChatStore::new();

        assert!(store.try_begin_exchange());
        assert!(!store.try_begin_exchange());

        store.mark_streaming(StreamTarget {
            conversation_id: "c".into(),
            message_id: "m".into(),
        });
        assert!(!store.stream_state().is_loading);
        assert!(store.stream_state().is_streaming);
        assert!(!store.try_begin_exchange());

        store.end_exchange();
        assert_eq!(store.stream_state(), &StreamState::default());
        assert!(store.try_begin_exchange());
    }

    #[test]
    fn test_history_excludes_target_and_metadata() {
        let mut store = ChatStore::new();
        let conv = store.create_conversation();
        store.append_user_message(&conv, "2+2?").unwrap();
        let target = store.begin_assistant_message(&conv, true).unwrap();

        let history = store.history_for_request(&conv, &target);
        assert_eq!(history, vec![ChatMessage::user("2+2?")]);
        assert_eq!(history[0].role(), Role::User);
    }

    #[test]
    fn test_current_messages_empty_without_selection() {
        let store = ChatStore::new();
        assert!(store.current_messages().is_empty());
        assert!(store.current_conversation().is_none());
    }
}
