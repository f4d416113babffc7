//! Local stand-in for the remote service
//!
//! Replays a canned reply one character at a time, so the rest of the
//! client can be exercised offline.

use crate::streaming::StreamEvent;
use crate::traits::{CompletionClient, CompletionRequest, CompletionResponse, CompletionStream};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

const REPLY_PREFIX: &str = "This is a simulated response. I will help you with your request about ";
const ECHO_CHARS: usize = 30;

pub struct SimulatedClient {
    char_delay: Duration,
}

impl SimulatedClient {
    pub fn new() -> Self {
        Self::with_delay(Duration::from_millis(30))
    }

    pub fn with_delay(char_delay: Duration) -> Self {
        Self { char_delay }
    }

    pub fn reply_for(request: &CompletionRequest) -> String {
        let topic: String = request
            .last_user_content()
            .unwrap_or_default()
            .chars()
            .take(ECHO_CHARS)
            .collect();
        format!("{}{}...", REPLY_PREFIX, topic)
    }
}

impl Default for SimulatedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for SimulatedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        Ok(CompletionResponse {
            content: Some(Self::reply_for(&request)),
            reasoning: None,
            model: request.model,
            usage: None,
            finish_reason: Some("stop".to_string()),
        })
    }

    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream> {
        let reply = Self::reply_for(&request);
        let delay = self.char_delay;

        Ok(Box::pin(async_stream::stream! {
            for ch in reply.chars() {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(StreamEvent::message(ch.to_string()));
            }
            yield Ok(StreamEvent::Done { finish_reason: Some("stop".to_string()) });
        }))
    }
}
