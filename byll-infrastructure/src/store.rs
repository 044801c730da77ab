use byll_application::LedgerStore;
use byll_domain::{ConversationId, Ledger, LedgerEntry, LedgerError, Money, PersonName};
use dashmap::DashMap;
use fxhash::FxBuildHasher;
use parking_lot::Mutex;
use std::sync::Arc;

type SharedLedger = Arc<Mutex<Ledger>>;

/// Process-lifetime ledgers keyed by conversation.
///
/// The map shard lock is only held long enough to clone the ledger handle, so
/// a slow operation on one conversation never blocks another.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    ledgers: DashMap<ConversationId, SharedLedger, FxBuildHasher>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ledger_or_create(&self, conversation: &ConversationId) -> SharedLedger {
        if let Some(ledger) = self.ledgers.get(conversation) {
            return Arc::clone(&ledger);
        }
        Arc::clone(&self.ledgers.entry(conversation.clone()).or_default())
    }

    fn ledger(&self, conversation: &ConversationId) -> Option<SharedLedger> {
        self.ledgers
            .get(conversation)
            .map(|ledger| Arc::clone(&ledger))
    }

    /// Drops the map key of an empty ledger nobody else holds. Runs under the
    /// shard write lock, so no new handle can be cloned meanwhile.
    fn evict_if_idle(&self, conversation: &ConversationId) {
        let evicted = self.ledgers.remove_if(conversation, |_, ledger| {
            Arc::strong_count(ledger) == 1 && ledger.lock().is_empty()
        });
        if evicted.is_some() {
            tracing::trace!(conversation = %conversation, "Idle ledger dropped");
        }
    }

    pub fn conversation_count(&self) -> usize {
        self.ledgers.len()
    }
}

fn unknown(person: &str) -> LedgerError {
    LedgerError::UnknownPerson {
        person: PersonName::from(person),
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn record_contribution(
        &self,
        conversation: &ConversationId,
        person: PersonName,
        delta: Money,
    ) -> Result<Money, LedgerError> {
        let ledger = self.ledger_or_create(conversation);
        let balance = ledger.lock().record(person.clone(), delta)?;
        tracing::debug!(
            conversation = %conversation,
            person = %person,
            delta = %delta,
            balance = %balance,
            "Contribution recorded"
        );
        Ok(balance)
    }

    fn remove_contribution(
        &self,
        conversation: &ConversationId,
        person: &str,
        delta: Money,
    ) -> Result<Money, LedgerError> {
        let ledger = self.ledger(conversation).ok_or_else(|| unknown(person))?;
        let balance = ledger.lock().remove(person, delta)?;
        tracing::debug!(
            conversation = %conversation,
            person,
            delta = %delta,
            balance = %balance,
            "Contribution removed"
        );
        Ok(balance)
    }

    fn remove_participant(
        &self,
        conversation: &ConversationId,
        person: &str,
    ) -> Result<LedgerEntry, LedgerError> {
        let ledger = self.ledger(conversation).ok_or_else(|| unknown(person))?;
        let (person, balance) = ledger.lock().remove_participant(person)?;
        drop(ledger);
        self.evict_if_idle(conversation);
        Ok(LedgerEntry {
            conversation: conversation.clone(),
            person,
            balance,
        })
    }

    fn list_entries(&self, conversation: &ConversationId) -> Vec<LedgerEntry> {
        self.ledger(conversation)
            .map(|ledger| ledger.lock().snapshot(conversation))
            .unwrap_or_default()
    }

    fn reset(&self, conversation: &ConversationId) -> usize {
        // Cleared in place: a writer holding the handle keeps using the same ledger.
        let removed = self
            .ledger(conversation)
            .map(|ledger| ledger.lock().clear())
            .unwrap_or(0);
        self.evict_if_idle(conversation);
        removed
    }
}
