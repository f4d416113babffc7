use async_trait::async_trait;

use crate::error::Result;

/// String-valued key-value storage (the browser's local storage, in spirit)
///
/// Values are opaque JSON text; typing happens in `ChatRepository`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value for `key` (last write wins)
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
