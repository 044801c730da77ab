//! Test doubles for the webhook side

use byll_application::{MessageProcessor, Notifier, Reply};
use byll_domain::ConversationId;
use byll_infrastructure::{ByllCommandParser, InMemoryLedgerStore};
use tokio::sync::mpsc;

/// Notifier that forwards every reply to a channel instead of the network.
#[derive(Clone)]
pub struct RecordingNotifier {
    sent: mpsc::UnboundedSender<(ConversationId, Reply)>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(ConversationId, Reply)>) {
        let (sent, received) = mpsc::unbounded_channel();
        (Self { sent }, received)
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, conversation: &ConversationId, reply: Reply) {
        // The receiver may already be gone when a test stops listening early.
        let _ = self.sent.send((conversation.clone(), reply));
    }
}

/// Processor over a fresh store, leaked like the one built at startup.
pub fn processor() -> MessageProcessor<'static> {
    let store: &'static InMemoryLedgerStore = Box::leak(Box::new(InMemoryLedgerStore::new()));
    MessageProcessor::new(&ByllCommandParser, store)
}
