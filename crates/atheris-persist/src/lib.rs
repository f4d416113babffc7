pub mod error;
pub mod store;
pub mod stores;
pub mod repository;

pub use error::{PersistError, Result};
pub use store::KeyValueStore;
pub use stores::{FileStore, MemoryStore};
pub use repository::{ChatRepository, Snapshot, CONVERSATIONS_KEY, FOLDERS_KEY, SETTINGS_KEY};
