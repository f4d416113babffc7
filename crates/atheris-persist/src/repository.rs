use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use atheris_types::{Conversation, Folder, UserSettings};

use crate::error::Result;
use crate::store::KeyValueStore;
use crate::stores::{FileStore, MemoryStore};

pub const CONVERSATIONS_KEY: &str = "conversations";
pub const FOLDERS_KEY: &str = "folders";
pub const SETTINGS_KEY: &str = "userSettings";

/// Everything loaded at startup
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub conversations: Vec<Conversation>,
    pub folders: Vec<Folder>,
    pub settings: UserSettings,
}

/// Typed access to the persisted chat state
///
/// Loads never fail: a missing or malformed value falls back to the empty
/// (or default) state and is logged. Saves report errors to the caller.
#[derive(Clone)]
pub struct ChatRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ChatRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Arc::new(FileStore::open(dir).await?)))
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub async fn load(&self) -> Snapshot {
        let snapshot = Snapshot {
            conversations: self.load_conversations().await,
            folders: self.load_folders().await,
            settings: self.load_settings().await,
        };
        tracing::info!(
            conversations = snapshot.conversations.len(),
            folders = snapshot.folders.len(),
            "loaded chat state"
        );
        snapshot
    }

    pub async fn load_conversations(&self) -> Vec<Conversation> {
        self.load_or_default(CONVERSATIONS_KEY).await
    }

    pub async fn load_folders(&self) -> Vec<Folder> {
        self.load_or_default(FOLDERS_KEY).await
    }

    pub async fn load_settings(&self) -> UserSettings {
        self.load_or_default(SETTINGS_KEY).await
    }

    pub async fn save_conversations(&self, conversations: &[Conversation]) -> Result<()> {
        self.save(CONVERSATIONS_KEY, conversations).await
    }

    pub async fn save_folders(&self, folders: &[Folder]) -> Result<()> {
        self.save(FOLDERS_KEY, folders).await
    }

    pub async fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        self.save(SETTINGS_KEY, settings).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }

    async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, json).await?;
        tracing::trace!(key, "saved");
        Ok(())
    }

    async fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value, using defaults");
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "malformed stored value, using defaults");
                T::default()
            }
        }
    }
}
