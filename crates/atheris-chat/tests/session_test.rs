mod common;

use std::sync::Arc;

use atheris_chat::{ChatSession, EventSink, StreamingCoordinator};
use atheris_persist::{ChatRepository, KeyValueStore, MemoryStore, CONVERSATIONS_KEY, FOLDERS_KEY};
use atheris_types::{ChatEvent, Conversation, Folder, NoticeLevel};
use common::{drain, session_with_events, text, Reply, ScriptedClient};

fn notices(events: &[ChatEvent]) -> Vec<(NoticeLevel, &str)> {
    events
        .iter()
        .filter_map(|e| match e {
            ChatEvent::Notice { level, message } => Some((*level, message.as_str())),
            _ => None,
        })
        .collect()
}

async fn stored<T: serde::de::DeserializeOwned>(store: &MemoryStore, key: &str) -> T {
    let raw = store.get(key).await.unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_mutations_are_written_through() {
    let store = Arc::new(MemoryStore::new());
    let session = ChatSession::load(ChatRepository::new(store.clone()), EventSink::disabled()).await;

    let conversation = session.create_conversation().await;
    let folder = session.create_folder("Work").await;
    session.move_conversation_to_folder(&conversation, Some(&folder)).await;
    session.star_conversation(&conversation, true).await;

    let conversations: Vec<Conversation> = stored(&store, CONVERSATIONS_KEY).await;
    assert_eq!(conversations.len(), 1);
    assert!(conversations[0].starred);
    assert_eq!(conversations[0].folder_id.as_deref(), Some(folder.as_str()));

    let folders: Vec<Folder> = stored(&store, FOLDERS_KEY).await;
    assert_eq!(folders[0].name, "Work");

    session.delete_folder(&folder).await;
    let conversations: Vec<Conversation> = stored(&store, CONVERSATIONS_KEY).await;
    let folders: Vec<Folder> = stored(&store, FOLDERS_KEY).await;
    assert!(conversations[0].folder_id.is_none());
    assert!(folders.is_empty());
}

#[tokio::test]
async fn test_deleting_last_conversation_persists_empty_list() {
    let store = Arc::new(MemoryStore::new());
    let session = ChatSession::load(ChatRepository::new(store.clone()), EventSink::disabled()).await;

    let id = session.create_conversation().await;
    session.delete_conversation(&id).await;

    let conversations: Vec<Conversation> = stored(&store, CONVERSATIONS_KEY).await;
    assert!(conversations.is_empty());
}

#[tokio::test]
async fn test_reload_restores_exchange() {
    let repository = ChatRepository::in_memory();
    let session = ChatSession::load(repository.clone(), EventSink::disabled()).await;
    let client = Arc::new(ScriptedClient::new(vec![Reply::Events(text(&["Hi", " there"]))]));
    StreamingCoordinator::new(session.clone(), client)
        .send_message("Hello", false)
        .await
        .unwrap();

    let reloaded = ChatSession::load(repository, EventSink::disabled()).await;
    let conversations = reloaded.conversations();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].title, "Hello");
    assert_eq!(conversations[0].messages[1].content, "Hi there");
    assert_eq!(reloaded.current_conversation_id(), None);
}

#[tokio::test]
async fn test_open_dir_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let session = ChatSession::open_dir(dir.path(), EventSink::disabled()).await.unwrap();
    let id = session.create_conversation().await;
    session.update_conversation_title(&id, "Saved").await;

    let reopened = ChatSession::open_dir(dir.path(), EventSink::disabled()).await.unwrap();
    assert_eq!(reopened.conversation(&id).unwrap().title, "Saved");
}

#[tokio::test]
async fn test_notices_for_registry_actions() {
    let (session, mut rx) = session_with_events().await;

    let conversation = session.create_conversation().await;
    let folder = session.create_folder("Work").await;
    session.rename_folder(&folder, "Projects").await;
    session.star_conversation(&conversation, true).await;
    session.star_conversation(&conversation, false).await;
    session.move_conversation_to_folder(&conversation, Some(&folder)).await;
    session.move_conversation_to_folder(&conversation, None).await;
    session.delete_folder(&folder).await;
    session.delete_conversation(&conversation).await;

    let events = drain(&mut rx);
    let expected = [
        "Folder created",
        "Folder renamed",
        "Conversation starred",
        "Conversation unstarred",
        "Moved to folder",
        "Removed from folder",
        "Folder deleted",
        "Conversation deleted",
    ];
    let got = notices(&events);
    assert_eq!(got.iter().map(|(_, m)| *m).collect::<Vec<_>>(), expected);
    assert!(got.iter().all(|(level, _)| *level == NoticeLevel::Success));
}

#[tokio::test]
async fn test_missing_ids_are_silent() {
    let (session, mut rx) = session_with_events().await;

    assert!(!session.delete_conversation("missing").await);
    assert!(!session.star_conversation("missing", true).await);
    assert!(!session.rename_folder("missing", "x").await);
    assert!(!session.delete_folder("missing").await);
    assert_eq!(session.toggle_folder_expanded("missing").await, None);
    assert!(!session.append_chunk("missing", "missing", "x", None));

    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_delete_current_moves_selection() {
    let (session, _rx) = session_with_events().await;
    let first = session.create_conversation().await;
    let second = session.create_conversation().await;

    assert_eq!(session.delete_current_conversation().await, Some(second));
    assert_eq!(session.current_conversation_id(), Some(first));
}

#[tokio::test]
async fn test_settings_persist() {
    let repository = ChatRepository::in_memory();
    let session = ChatSession::load(repository.clone(), EventSink::disabled()).await;

    session
        .update_settings(|s| s.model = "gemma-7b-it".to_string())
        .await;

    let reloaded = ChatSession::load(repository, EventSink::disabled()).await;
    assert_eq!(reloaded.settings().model, "gemma-7b-it");
}

#[tokio::test]
async fn test_sidebar_reflects_session() {
    let (session, _rx) = session_with_events().await;
    let folder = session.create_folder("Work").await;
    let filed = session.create_conversation().await;
    let loose = session.create_conversation().await;
    session.move_conversation_to_folder(&filed, Some(&folder)).await;

    let view = session.sidebar("");
    assert_eq!(view.recent.len(), 1);
    assert_eq!(view.recent[0].id, loose);
    assert_eq!(view.folders[0].conversations[0].id, filed);
}

#[tokio::test]
async fn test_repeated_star_keeps_conversation_starred() {
    let store = Arc::new(MemoryStore::new());
    let session = ChatSession::load(ChatRepository::new(store.clone()), EventSink::disabled()).await;
    let conversation = session.create_conversation().await;

    assert!(session.star_conversation(&conversation, true).await);
    assert!(session.star_conversation(&conversation, true).await);

    assert!(session.conversation(&conversation).unwrap().starred);
    let conversations: Vec<Conversation> = stored(&store, CONVERSATIONS_KEY).await;
    assert!(conversations[0].starred);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutations_store_final_state() {
    let dir = tempfile::tempdir().unwrap();
    let session = ChatSession::open_dir(dir.path(), EventSink::disabled()).await.unwrap();

    let tasks: Vec<_> = (0..12)
        .map(|i| {
            let session = session.clone();
            tokio::spawn(async move {
                let id = session.create_conversation().await;
                session.update_conversation_title(&id, &format!("Chat {}", i)).await;
                session.star_conversation(&id, i % 2 == 0).await;
                session.create_folder(&format!("Folder {}", i)).await;
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let reopened = ChatSession::open_dir(dir.path(), EventSink::disabled()).await.unwrap();
    assert_eq!(reopened.conversations(), session.conversations());
    assert_eq!(reopened.folders(), session.folders());
    assert_eq!(reopened.conversations().len(), 12);
    assert_eq!(reopened.conversations().iter().filter(|c| c.starred).count(), 6);
}
