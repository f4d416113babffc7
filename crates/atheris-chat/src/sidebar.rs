//! Derived sidebar listing: starred, recent and per-folder sections

use chrono::{DateTime, Utc};

use atheris_types::{Conversation, Folder};

use crate::store::ChatStore;

#[derive(Debug, Clone, PartialEq)]
pub struct FolderSection {
    pub folder: Folder,
    pub conversations: Vec<Conversation>,
    /// Expanded flag after search is applied
    pub is_expanded: bool,
}

/// Snapshot of everything the conversation sidebar shows
///
/// Starred conversations appear in `starred` regardless of folder. `recent`
/// holds unstarred conversations without a (live) folder. All lists are most
/// recently updated first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidebarView {
    pub starred: Vec<Conversation>,
    pub recent: Vec<Conversation>,
    pub folders: Vec<FolderSection>,
}

impl SidebarView {
    /// Build the view, filtering by a case-insensitive search term
    ///
    /// A folder survives the filter when its name matches or any member does;
    /// a member match forces the section open.
    pub fn build(store: &ChatStore, search: &str) -> Self {
        let term = search.trim().to_lowercase();
        let sorted = store.conversations_by_recency();
        let has_folder = |c: &Conversation| {
            c.folder_id
                .as_deref()
                .is_some_and(|id| store.folder(id).is_some())
        };

        let starred = sorted
            .iter()
            .filter(|c| c.starred && c.matches(&term))
            .map(|c| (*c).clone())
            .collect();

        let recent = sorted
            .iter()
            .filter(|c| !c.starred && !has_folder(**c) && c.matches(&term))
            .map(|c| (*c).clone())
            .collect();

        let folders = store
            .folders()
            .iter()
            .filter_map(|folder| {
                let members: Vec<Conversation> = sorted
                    .iter()
                    .filter(|c| c.folder_id.as_deref() == Some(folder.id.as_str()))
                    .map(|c| (*c).clone())
                    .collect();

                if term.is_empty() {
                    return Some(FolderSection {
                        folder: folder.clone(),
                        conversations: members,
                        is_expanded: folder.is_expanded,
                    });
                }

                let name_match = folder.name.to_lowercase().contains(&term);
                let matching: Vec<Conversation> = members
                    .iter()
                    .filter(|c| c.matches(&term))
                    .cloned()
                    .collect();

                if matching.is_empty() && !name_match {
                    return None;
                }
                let is_expanded = folder.is_expanded || !matching.is_empty();
                Some(FolderSection {
                    folder: folder.clone(),
                    conversations: if matching.is_empty() { members } else { matching },
                    is_expanded,
                })
            })
            .collect();

        Self {
            starred,
            recent,
            folders,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.starred.is_empty() && self.recent.is_empty() && self.folders.is_empty()
    }
}

/// Short relative label for a conversation timestamp
///
/// `Today`, `Yesterday`, `Nd ago` within a week, otherwise `YYYY-MM-DD`.
pub fn relative_day_label(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = now
        .date_naive()
        .signed_duration_since(at.date_naive())
        .num_days();
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{}d ago", days),
        _ => at.format("%Y-%m-%d").to_string(),
    }
}
