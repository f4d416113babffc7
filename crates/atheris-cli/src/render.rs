//! Terminal rendering of session events and sidebar listings

use std::io::Write;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use atheris::{relative_day_label, ChatEvent, Conversation, NoticeLevel, SidebarView};

/// Print events as they arrive until the sender side closes
pub fn spawn_event_printer(mut rx: mpsc::UnboundedReceiver<ChatEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut in_reasoning = false;
        while let Some(event) = rx.recv().await {
            let mut out = std::io::stdout().lock();
            match event {
                ChatEvent::MessageStarted { .. } => {
                    in_reasoning = false;
                    let _ = write!(out, "\nassistant> ");
                }
                ChatEvent::Chunk { content, reasoning, .. } => {
                    if let Some(reasoning) = reasoning {
                        if !in_reasoning {
                            let _ = write!(out, "[thinking] ");
                            in_reasoning = true;
                        }
                        let _ = write!(out, "{}", reasoning);
                    }
                    if !content.is_empty() {
                        if in_reasoning {
                            let _ = write!(out, "\n\n");
                            in_reasoning = false;
                        }
                        let _ = write!(out, "{}", content);
                    }
                }
                ChatEvent::MessageFinished { .. } => {
                    let _ = writeln!(out, "\n");
                }
                ChatEvent::MessageFailed { error, .. } => {
                    let _ = writeln!(out, "\n{}\n", error);
                }
                ChatEvent::Notice { level, message } => {
                    let tag = match level {
                        NoticeLevel::Success => "ok",
                        NoticeLevel::Warning => "warn",
                        NoticeLevel::Error => "error",
                    };
                    let _ = writeln!(out, "[{}] {}", tag, message);
                }
                ChatEvent::StreamStateChanged { .. } => {}
            }
            let _ = out.flush();
        }
    })
}

/// Render the sidebar; returns conversation ids in display order for `/open <n>`
pub fn print_sidebar(view: &SidebarView, current: Option<&str>) -> Vec<String> {
    let mut order = Vec::new();
    let now = Utc::now();

    let mut line = |conversation: &Conversation, indent: &str| {
        order.push(conversation.id.clone());
        let marker = if current == Some(conversation.id.as_str()) { '*' } else { ' ' };
        println!(
            "{}{}{:>3}. {}  ({})",
            indent,
            marker,
            order.len(),
            conversation.title,
            relative_day_label(conversation.updated_at, now)
        );
    };

    if !view.starred.is_empty() {
        println!("Starred");
        for conversation in &view.starred {
            line(conversation, "  ");
        }
    }
    for section in &view.folders {
        let arrow = if section.is_expanded { 'v' } else { '>' };
        println!("{} {} [{}]", arrow, section.folder.name, section.folder.id);
        if section.is_expanded {
            for conversation in &section.conversations {
                line(conversation, "  ");
            }
        }
    }
    if !view.recent.is_empty() {
        println!("Recent");
        for conversation in &view.recent {
            line(conversation, "  ");
        }
    }
    if view.is_empty() {
        println!("(no conversations)");
    }
    order
}
