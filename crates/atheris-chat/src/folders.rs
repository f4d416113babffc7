//! Folder registry operations

use atheris_types::{Conversation, Folder};

use crate::store::ChatStore;

impl ChatStore {
    pub fn create_folder(&mut self, name: &str) -> String {
        let folder = Folder::new(name.trim());
        let id = folder.id.clone();
        self.folders.push(folder);
        id
    }

    pub fn rename_folder(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.folder_mut(id) {
            Some(folder) => {
                folder.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Clear membership on every member, then remove the folder
    pub fn delete_folder(&mut self, id: &str) -> bool {
        if self.folder(id).is_none() {
            return false;
        }

        for conversation in self
            .conversations
            .iter_mut()
            .filter(|c| c.folder_id.as_deref() == Some(id))
        {
            conversation.folder_id = None;
        }
        self.folders.retain(|f| f.id != id);
        true
    }

    /// Flip `is_expanded`, returning the new value
    pub fn toggle_folder_expanded(&mut self, id: &str) -> Option<bool> {
        let folder = self.folder_mut(id)?;
        folder.is_expanded = !folder.is_expanded;
        Some(folder.is_expanded)
    }

    /// Members of a folder, most recently updated first
    pub fn conversations_in_folder(&self, folder_id: &str) -> Vec<&Conversation> {
        self.conversations_by_recency()
            .into_iter()
            .filter(|c| c.folder_id.as_deref() == Some(folder_id))
            .collect()
    }
}
