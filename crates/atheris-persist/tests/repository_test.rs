use std::sync::Arc;

use atheris_persist::{
    ChatRepository, FileStore, KeyValueStore, MemoryStore, CONVERSATIONS_KEY, FOLDERS_KEY,
    SETTINGS_KEY,
};
use atheris_types::{Conversation, Folder, Message, Theme, UserSettings};

fn sample_conversation() -> Conversation {
    let mut conv = Conversation::new();
    conv.title = "Greeting".to_string();
    conv.messages.push(Message::user("Hello"));
    conv.last_message = "Hello".to_string();
    conv.folder_id = Some("f1".to_string());
    conv
}

#[tokio::test]
async fn test_empty_store_loads_defaults() {
    let repo = ChatRepository::in_memory();
    let snapshot = repo.load().await;

    assert!(snapshot.conversations.is_empty());
    assert!(snapshot.folders.is_empty());
    assert_eq!(snapshot.settings, UserSettings::default());
}

#[tokio::test]
async fn test_malformed_json_falls_back_to_empty() {
    let store = MemoryStore::with_entries([
        (CONVERSATIONS_KEY, "[{\"id\": oops"),
        (FOLDERS_KEY, "not json"),
        (SETTINGS_KEY, "{\"theme\": 42}"),
    ]);
    let repo = ChatRepository::new(Arc::new(store));

    let snapshot = repo.load().await;
    assert!(snapshot.conversations.is_empty());
    assert!(snapshot.folders.is_empty());
    assert_eq!(snapshot.settings, UserSettings::default());
}

#[tokio::test]
async fn test_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let conv = sample_conversation();
    let folder = Folder::new("Work");
    let settings = UserSettings {
        theme: Theme::Light,
        ..UserSettings::default()
    };

    {
        let repo = ChatRepository::open_dir(dir.path()).await.unwrap();
        repo.save_conversations(std::slice::from_ref(&conv)).await.unwrap();
        repo.save_folders(std::slice::from_ref(&folder)).await.unwrap();
        repo.save_settings(&settings).await.unwrap();
    }

    assert!(dir.path().join("conversations.json").exists());
    assert!(dir.path().join("userSettings.json").exists());

    let repo = ChatRepository::open_dir(dir.path()).await.unwrap();
    let snapshot = repo.load().await;

    assert_eq!(snapshot.conversations.len(), 1);
    assert_eq!(snapshot.conversations[0].id, conv.id);
    assert_eq!(snapshot.conversations[0].messages[0].content, "Hello");
    assert_eq!(snapshot.conversations[0].folder_id.as_deref(), Some("f1"));
    assert_eq!(snapshot.folders, vec![folder]);
    assert_eq!(snapshot.settings.theme, Theme::Light);
}

#[tokio::test]
async fn test_saving_empty_list_overwrites_previous_value() {
    let repo = ChatRepository::in_memory();
    repo.save_conversations(&[sample_conversation()]).await.unwrap();
    repo.save_conversations(&[]).await.unwrap();

    assert!(repo.load_conversations().await.is_empty());
}

#[tokio::test]
async fn test_file_store_remove_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();

    store.set("folders", "[]".to_string()).await.unwrap();
    store.set("conversations", "[]".to_string()).await.unwrap();

    store.remove("folders").await.unwrap();
    store.remove("folders").await.unwrap();
    assert_eq!(store.get("folders").await.unwrap(), None);

    store.clear().await.unwrap();
    assert_eq!(store.get("conversations").await.unwrap(), None);
}
