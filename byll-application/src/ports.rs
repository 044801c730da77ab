use crate::model::{Command, Reply};
use byll_domain::{ConversationId, LedgerEntry, LedgerError, Money, PersonName};

pub trait CommandParser: Send + Sync {
    fn parse(&self, text: &str) -> Command;
}

/// Per-conversation ledgers. Operations on one conversation are serialized;
/// different conversations do not block each other.
pub trait LedgerStore: Send + Sync {
    /// Adds `delta` to the person's balance, creating the entry if absent.
    fn record_contribution(
        &self,
        conversation: &ConversationId,
        person: PersonName,
        delta: Money,
    ) -> Result<Money, LedgerError>;

    fn remove_contribution(
        &self,
        conversation: &ConversationId,
        person: &str,
        delta: Money,
    ) -> Result<Money, LedgerError>;

    fn remove_participant(
        &self,
        conversation: &ConversationId,
        person: &str,
    ) -> Result<LedgerEntry, LedgerError>;

    /// Entries in insertion order. Never creates a ledger.
    fn list_entries(&self, conversation: &ConversationId) -> Vec<LedgerEntry>;

    /// Deletes every entry of the conversation and returns how many there were.
    fn reset(&self, conversation: &ConversationId) -> usize;
}

/// Outbound channel back to the conversation. Delivery failures stay inside
/// the implementation.
pub trait Notifier: Clone + Send + Sync + 'static {
    fn notify(
        &self,
        conversation: &ConversationId,
        reply: Reply,
    ) -> impl Future<Output = ()> + Send;
}
