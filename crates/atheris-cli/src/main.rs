mod commands;
mod config;
mod render;

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atheris::prelude::*;
use atheris::models;

use crate::commands::{Command, HELP};
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);
    tracing::info!(provider = ?config.llm.provider, data_dir = %config.storage.data_dir.display(), "Starting Atheris");

    let (events, rx) = EventSink::channel();
    let printer = render::spawn_event_printer(rx);

    let session = ChatSession::open_dir(&config.storage.data_dir, events).await?;
    let client = ClientFactory::create_client(config.provider_config())?;
    let coordinator = StreamingCoordinator::with_config(session.clone(), client, config.coordinator_config());

    println!("Atheris chat. /help for commands.");
    let mut last_listing: Vec<String> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{}", usage);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        run(&coordinator, command, &mut last_listing).await;
    }

    drop(coordinator);
    drop(session);
    let _ = printer.await;
    Ok(())
}

async fn run(coordinator: &StreamingCoordinator, command: Command, last_listing: &mut Vec<String>) {
    let session = coordinator.session();

    match command {
        Command::Send { text, use_reasoning } => {
            match coordinator.send_message(&text, use_reasoning).await {
                Ok(outcome) => tracing::debug!(?outcome, "exchange finished"),
                Err(e) => report(e),
            }
        }
        Command::Regenerate => {
            let last_reply = session
                .current_messages()
                .iter()
                .rev()
                .find(|m| m.role == Role::Assistant)
                .map(|m| m.id.clone());
            match last_reply {
                Some(id) => {
                    if let Err(e) = coordinator.regenerate_message(&id).await {
                        report(e);
                    }
                }
                None => println!("Nothing to regenerate"),
            }
        }
        Command::New => {
            session.create_conversation().await;
            println!("Started a new conversation");
        }
        Command::List { search } => {
            let current = session.current_conversation_id();
            *last_listing = render::print_sidebar(&session.sidebar(&search), current.as_deref());
        }
        Command::Open(target) => {
            let id = resolve(&target, last_listing, &session.conversations());
            match id {
                Some(id) if session.select_conversation(Some(&id)) => print_transcript(session),
                _ => println!("No conversation matches {}", target),
            }
        }
        Command::Delete => {
            if session.delete_current_conversation().await.is_none() {
                println!("No conversation selected");
            }
        }
        Command::Star => match session
            .current_conversation_id()
            .and_then(|id| session.conversation(&id))
        {
            Some(current) => {
                session.star_conversation(&current.id, !current.starred).await;
            }
            None => println!("No conversation selected"),
        },
        Command::Title(title) => match session.current_conversation_id() {
            Some(id) if session.update_conversation_title(&id, &title).await => {
                println!("Title set to {}", title.trim());
            }
            _ => println!("No conversation selected"),
        },
        Command::Move(folder_id) => match session.current_conversation_id() {
            Some(id) => {
                if !session.move_conversation_to_folder(&id, folder_id.as_deref()).await {
                    println!("Unknown folder");
                }
            }
            None => println!("No conversation selected"),
        },
        Command::FolderCreate(name) => {
            let id = session.create_folder(&name).await;
            println!("Folder id: {}", id);
        }
        Command::FolderRename { id, name } => {
            if !session.rename_folder(&id, &name).await {
                println!("Unknown folder {}", id);
            }
        }
        Command::FolderDelete(id) => {
            if !session.delete_folder(&id).await {
                println!("Unknown folder {}", id);
            }
        }
        Command::FolderToggle(id) => {
            if session.toggle_folder_expanded(&id).await.is_none() {
                println!("Unknown folder {}", id);
            }
        }
        Command::Model(None) => {
            let selected = session.settings().model;
            for model in models::available_models() {
                let marker = if model.id == selected { '*' } else { ' ' };
                println!("{} {} ({})", marker, model.id, model.name);
            }
        }
        Command::Model(Some(id)) => {
            if models::find_model(&id).is_none() {
                println!("Unknown model {}, using it anyway", id);
            }
            session.update_settings(|s| s.model = id.clone()).await;
            println!("Model set to {}", models::display_name(&id));
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

/// Accept a listing index, a full id or a unique id prefix
fn resolve(target: &str, last_listing: &[String], conversations: &[Conversation]) -> Option<String> {
    if let Ok(index) = target.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| last_listing.get(i)).cloned();
    }
    let mut matches = conversations.iter().filter(|c| c.id.starts_with(target));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.id.clone()),
        _ => None,
    }
}

fn print_transcript(session: &ChatSession) {
    for message in session.current_messages() {
        let who = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("{}> {}", who, message.content);
    }
}

fn report(error: ChatError) {
    match error {
        // Already surfaced as notices
        ChatError::ExchangeInProgress | ChatError::CannotRegenerate { .. } => {
            tracing::debug!(error = %error, "command rejected");
        }
        other => println!("{}", other),
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
