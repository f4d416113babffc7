//! Drives one completion exchange at a time into the session

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use futures::StreamExt;
use tracing::{debug, error, info, warn};

use atheris_llm::{CompletionClient, CompletionOptions, CompletionRequest, StreamEvent};
use atheris_types::APOLOGY_MESSAGE;

use crate::error::{ChatError, Result};
use crate::session::ChatSession;
use crate::store::StreamTarget;

const FAILURE_NOTICE: &str = "Failed to get AI response";

#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfig {
    /// Base request options; `use_reasoning` is overridden per exchange
    pub options: CompletionOptions,
    /// Give up when the upstream stays silent this long
    pub idle_timeout: Option<Duration>,
}

impl CoordinatorConfig {
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }
}

/// How an exchange ended
///
/// Upstream failures are recovered locally and reported here rather than as
/// an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Completed {
        conversation_id: String,
        message_id: String,
    },

    Failed {
        conversation_id: String,
        message_id: String,
        error: String,
    },

    /// The target conversation or message disappeared mid-stream
    Abandoned {
        conversation_id: String,
        message_id: String,
    },
}

impl ExchangeOutcome {
    pub fn message_id(&self) -> &str {
        match self {
            Self::Completed { message_id, .. }
            | Self::Failed { message_id, .. }
            | Self::Abandoned { message_id, .. } => message_id,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Holds the exchange slot; clears loading and streaming flags on drop
pub struct StreamGuard {
    session: ChatSession,
}

impl StreamGuard {
    pub fn acquire(session: &ChatSession) -> Option<Self> {
        session.try_begin_exchange().then(|| Self {
            session: session.clone(),
        })
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.session.end_exchange();
    }
}

pub struct StreamingCoordinator {
    session: ChatSession,
    client: Arc<dyn CompletionClient>,
    config: CoordinatorConfig,
}

impl StreamingCoordinator {
    pub fn new(session: ChatSession, client: Arc<dyn CompletionClient>) -> Self {
        Self::with_config(session, client, CoordinatorConfig::default())
    }

    pub fn with_config(session: ChatSession, client: Arc<dyn CompletionClient>, config: CoordinatorConfig) -> Self {
        Self {
            session,
            client,
            config,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Send a user turn on the current conversation and stream the reply
    ///
    /// Blank input is rejected without touching state. Only one exchange may
    /// run at a time; an overlapping call returns `ExchangeInProgress`.
    pub async fn send_message(&self, text: &str, use_reasoning: bool) -> Result<ExchangeOutcome> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let guard = self.acquire()?;

        let (conversation_id, _) = self.session.append_user_message(None, text).await?;
        self.run_exchange(guard, conversation_id, use_reasoning).await
    }

    /// Replace an assistant reply with a freshly streamed one
    ///
    /// The reply and everything after it are dropped; the new placeholder
    /// follows the surviving user turn and reuses the previous reasoning flag.
    pub async fn regenerate_message(&self, message_id: &str) -> Result<ExchangeOutcome> {
        let guard = self.acquire()?;

        let (conversation_id, target) = self.session.prepare_regenerate(message_id).await?;
        debug!(conversation_id = %conversation_id, use_reasoning = target.use_reasoning, "regenerating");
        self.run_exchange(guard, conversation_id, target.use_reasoning).await
    }

    fn acquire(&self) -> Result<StreamGuard> {
        StreamGuard::acquire(&self.session).ok_or_else(|| {
            self.session.events().warning("Please wait for the current response to finish");
            ChatError::ExchangeInProgress
        })
    }

    async fn run_exchange(
        &self,
        guard: StreamGuard,
        conversation_id: String,
        use_reasoning: bool,
    ) -> Result<ExchangeOutcome> {
        let message_id = self
            .session
            .begin_assistant_message(&conversation_id, use_reasoning)?;
        self.session.mark_streaming(StreamTarget {
            conversation_id: conversation_id.clone(),
            message_id: message_id.clone(),
        });

        let outcome = match self.relay(&conversation_id, &message_id, use_reasoning).await {
            Ok(()) => {
                if self
                    .session
                    .finalize_assistant_message(&conversation_id, &message_id)
                    .await
                {
                    info!(conversation_id = %conversation_id, message_id = %message_id, "response complete");
                    ExchangeOutcome::Completed {
                        conversation_id,
                        message_id,
                    }
                } else {
                    warn!(conversation_id = %conversation_id, message_id = %message_id, "response target vanished");
                    ExchangeOutcome::Abandoned {
                        conversation_id,
                        message_id,
                    }
                }
            }
            Err(e) => {
                error!(conversation_id = %conversation_id, message_id = %message_id, error = %e, "completion failed");
                self.session
                    .fail_assistant_message(&conversation_id, &message_id, APOLOGY_MESSAGE)
                    .await;
                self.session.events().error(FAILURE_NOTICE);
                ExchangeOutcome::Failed {
                    conversation_id,
                    message_id,
                    error: e.to_string(),
                }
            }
        };

        drop(guard);
        Ok(outcome)
    }

    /// Stream upstream deltas into the target message until the stream ends
    async fn relay(&self, conversation_id: &str, message_id: &str, use_reasoning: bool) -> anyhow::Result<()> {
        let history = self
            .session
            .read(|s| s.history_for_request(conversation_id, message_id));
        let model = self.session.settings().model;
        let options = self.config.options.clone().use_reasoning(use_reasoning);
        let request = CompletionRequest::new(model, history).with_options(options);

        let mut stream = self.client.stream_completion(request).await?;

        loop {
            let next = match self.config.idle_timeout {
                Some(limit) => tokio::time::timeout(limit, stream.next())
                    .await
                    .map_err(|_| anyhow!("no response from model within {:?}", limit))?,
                None => stream.next().await,
            };

            match next.transpose()? {
                Some(StreamEvent::Message { content }) => {
                    self.session.append_chunk(conversation_id, message_id, &content, None);
                }
                Some(StreamEvent::Reasoning { content }) => {
                    self.session.append_chunk(conversation_id, message_id, "", Some(&content));
                }
                Some(StreamEvent::Done { finish_reason }) => {
                    debug!(?finish_reason, "stream done");
                    break;
                }
                None => break,
            }
        }

        Ok(())
    }
}
