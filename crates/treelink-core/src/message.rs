//! Message collaborator
//!
//! Per-item failures (a link the host refuses to create) are surfaced to the
//! user through this sink while the run continues with the remaining items.

use crate::Error;

/// Receives recoverable errors for display to the user.
pub trait MessageSink {
    fn show_error(&self, error: &Error);
}

/// Default sink that forwards to the tracing pipeline.
#[derive(Debug, Default)]
pub struct TracingMessageSink;

impl MessageSink for TracingMessageSink {
    fn show_error(&self, error: &Error) {
        tracing::error!("{error}");
    }
}

/// Sink that records messages, for hosts that batch-report and for tests.
#[derive(Debug, Default)]
pub struct CollectingMessageSink {
    messages: std::cell::RefCell<Vec<String>>,
}

impl CollectingMessageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl MessageSink for CollectingMessageSink {
    fn show_error(&self, error: &Error) {
        self.messages.borrow_mut().push(error.to_string());
    }
}
