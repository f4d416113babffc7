#![allow(dead_code)]

use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use atheris_chat::{ChatSession, EventSink};
use atheris_llm::{CompletionClient, CompletionRequest, CompletionResponse, CompletionStream, StreamEvent};
use atheris_types::ChatEvent;

/// One scripted reply
pub enum Reply {
    /// Yield these events, then end
    Events(Vec<StreamEvent>),
    /// Yield these events, then fail
    FailAfter(Vec<StreamEvent>, String),
    /// Refuse to open the stream
    FailSetup(String),
    /// Wait for the gate, then yield these events
    Gated(oneshot::Receiver<()>, Vec<StreamEvent>),
    /// Never yield anything
    Stall,
}

/// Completion client that replays scripted replies and records requests
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
        Err(anyhow!("not scripted"))
    }

    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream> {
        self.requests.lock().push(request);
        let reply = self
            .replies
            .lock()
            .pop_front()
            .ok_or_else(|| anyhow!("script exhausted"))?;

        let stream: CompletionStream = match reply {
            Reply::Events(events) => Box::pin(futures::stream::iter(events.into_iter().map(Ok::<_, anyhow::Error>))),
            Reply::FailAfter(events, error) => Box::pin(async_stream::stream! {
                for event in events {
                    yield Ok::<_, anyhow::Error>(event);
                }
                yield Err(anyhow!(error));
            }),
            Reply::FailSetup(error) => return Err(anyhow!(error)),
            Reply::Gated(gate, events) => Box::pin(async_stream::stream! {
                let _ = gate.await;
                for event in events {
                    yield Ok::<_, anyhow::Error>(event);
                }
            }),
            Reply::Stall => Box::pin(futures::stream::pending::<Result<StreamEvent>>()),
        };
        Ok(stream)
    }
}

pub fn text(chunks: &[&str]) -> Vec<StreamEvent> {
    let mut events: Vec<StreamEvent> = chunks.iter().map(|c| StreamEvent::message(*c)).collect();
    events.push(StreamEvent::done());
    events
}

pub async fn session_with_events() -> (ChatSession, mpsc::UnboundedReceiver<ChatEvent>) {
    let (sink, rx) = EventSink::channel();
    (ChatSession::in_memory(sink).await, rx)
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<ChatEvent>) -> Vec<ChatEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
