use tokio::sync::mpsc;

use atheris_types::ChatEvent;

/// Fire-and-forget publisher of [`ChatEvent`]s
///
/// Sending never blocks and never fails; events are dropped once the
/// receiving side is gone.
#[derive(Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<ChatEvent>>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Sink that discards everything
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: ChatEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(ChatEvent::success(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.emit(ChatEvent::warning(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(ChatEvent::error(message));
    }
}
