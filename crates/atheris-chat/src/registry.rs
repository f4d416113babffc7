//! Conversation registry operations

use tracing::debug;

use atheris_types::{derive_title, Conversation, Message, MessageStatus};

use crate::store::{ChatStore, RegenerateTarget};

impl ChatStore {
    /// Insert a fresh conversation at the top and select it
    pub fn create_conversation(&mut self) -> String {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.current_conversation_id = Some(id.clone());
        debug!(conversation_id = %id, "Created conversation");
        id
    }

    /// Selected conversation id, creating one if nothing usable is selected
    pub fn ensure_current_conversation(&mut self) -> String {
        match self.current_conversation() {
            Some(conversation) => conversation.id.clone(),
            None => self.create_conversation(),
        }
    }

    pub fn select_conversation(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.conversation(id).is_none() => false,
            _ => {
                self.current_conversation_id = id.map(str::to_string);
                true
            }
        }
    }

    /// Remove a conversation; selection falls back to the most recent survivor
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        if self.conversations.len() == before {
            return false;
        }

        if self.current_conversation_id.as_deref() == Some(id) {
            self.current_conversation_id = self
                .conversations_by_recency()
                .first()
                .map(|c| c.id.clone());
        }
        true
    }

    pub fn delete_current_conversation(&mut self) -> Option<String> {
        let id = self.current_conversation_id.clone()?;
        self.delete_conversation(&id).then_some(id)
    }

    /// Set the starred flag; repeating the same value leaves it unchanged
    pub fn star_conversation(&mut self, id: &str, starred: bool) -> bool {
        match self.conversation_mut(id) {
            Some(conversation) => {
                conversation.starred = starred;
                conversation.touch();
                true
            }
            None => false,
        }
    }

    pub fn update_conversation_title(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        match self.conversation_mut(id) {
            Some(conversation) => {
                conversation.title = title.to_string();
                conversation.touch();
                true
            }
            None => false,
        }
    }

    /// Assign or clear folder membership
    ///
    /// An unknown folder id leaves the conversation untouched.
    pub fn move_conversation_to_folder(&mut self, id: &str, folder_id: Option<&str>) -> bool {
        if let Some(folder_id) = folder_id {
            if self.folder(folder_id).is_none() {
                return false;
            }
        }
        match self.conversation_mut(id) {
            Some(conversation) => {
                conversation.folder_id = folder_id.map(str::to_string);
                conversation.touch();
                true
            }
            None => false,
        }
    }

    pub fn append_user_message(&mut self, conversation_id: &str, content: &str) -> Option<Message> {
        let conversation = self.conversation_mut(conversation_id)?;
        let message = Message::user(content);
        conversation.messages.push(message.clone());
        conversation.last_message = message.content.clone();
        conversation.touch();
        Some(message)
    }

    /// Append an empty assistant placeholder and return its id
    pub fn begin_assistant_message(&mut self, conversation_id: &str, wants_reasoning: bool) -> Option<String> {
        let conversation = self.conversation_mut(conversation_id)?;
        let message = Message::placeholder(wants_reasoning);
        let id = message.id.clone();
        conversation.messages.push(message);
        Some(id)
    }

    /// Concatenate deltas onto an open assistant message
    ///
    /// Missing targets and closed messages are ignored.
    pub fn append_chunk(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        content: &str,
        reasoning: Option<&str>,
    ) -> bool {
        self.conversation_mut(conversation_id)
            .and_then(|c| c.message_mut(message_id))
            .map(|m| m.push_delta(content, reasoning))
            .unwrap_or(false)
    }

    pub fn finalize_assistant_message(&mut self, conversation_id: &str, message_id: &str) -> bool {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return false;
        };
        let Some(message) = conversation.message_mut(message_id) else {
            return false;
        };
        if !message.status.is_open() {
            return false;
        }

        message.status = MessageStatus::Complete;
        let content = message.content.clone();
        conversation.last_message = content;
        conversation.touch();

        // A failed first exchange leaves the default title for the next success
        if conversation.has_default_title() {
            if let Some(title) = conversation.first_user_message().map(|m| derive_title(&m.content)) {
                conversation.title = title;
            }
        }
        true
    }

    /// Replace an open assistant message with a fixed error text
    pub fn fail_assistant_message(&mut self, conversation_id: &str, message_id: &str, error_text: &str) -> bool {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return false;
        };
        let Some(message) = conversation.message_mut(message_id) else {
            return false;
        };
        if !message.status.is_open() {
            return false;
        }

        message.content = error_text.to_string();
        message.status = MessageStatus::Failed;
        conversation.last_message = error_text.to_string();
        conversation.touch();
        true
    }

    /// Resolve a regenerate request without mutating anything
    pub fn regeneration_target(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> Result<RegenerateTarget, &'static str> {
        let conversation = self
            .conversation(conversation_id)
            .ok_or("conversation not found")?;
        let index = conversation.position(message_id).ok_or("message not found")?;
        let target = &conversation.messages[index];
        if !target.is_assistant() {
            return Err("not an assistant message");
        }
        if target.status.is_open() {
            return Err("message is still streaming");
        }
        let previous = index
            .checked_sub(1)
            .map(|i| &conversation.messages[i])
            .filter(|m| m.is_user())
            .ok_or("not preceded by a user message")?;

        Ok(RegenerateTarget {
            user_content: previous.content.clone(),
            use_reasoning: target.reasoning.is_some(),
        })
    }

    /// Drop a message and everything after it
    pub fn truncate_from(&mut self, conversation_id: &str, message_id: &str) -> bool {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return false;
        };
        let Some(index) = conversation.position(message_id) else {
            return false;
        };
        conversation.messages.truncate(index);
        if let Some(last) = conversation.messages.last() {
            conversation.last_message = last.content.clone();
        }
        conversation.touch();
        true
    }

    /// Conversation owning a message id
    pub fn conversation_for_message(&self, message_id: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|c| c.message(message_id).is_some())
    }
}
