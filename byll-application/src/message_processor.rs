use crate::{
    model::{Command, Intent, ProcessingOutcome},
    ports::{CommandParser, LedgerStore},
};
use byll_domain::{ConversationId, LedgerEntry, SettlementCalculator, SettlementError};

#[derive(Clone, Copy)]
pub struct MessageProcessor<'a> {
    parser: &'a dyn CommandParser,
    store: &'a dyn LedgerStore,
}

impl<'a> MessageProcessor<'a> {
    pub fn new(parser: &'a dyn CommandParser, store: &'a dyn LedgerStore) -> Self {
        Self { parser, store }
    }

    /// Parses one message and applies it to the conversation's ledger.
    pub fn process_text(&self, conversation: &ConversationId, text: &str) -> ProcessingOutcome {
        match self.parser.parse(text) {
            Command::Ledger(command) => self.handle(command.into_intent(conversation.clone())),
            Command::Greeting => ProcessingOutcome::Greeting,
            Command::Help(page) => ProcessingOutcome::Help(page),
            Command::StartSession => self.start_session(conversation),
            Command::Unrecognized => ProcessingOutcome::Unrecognized,
        }
    }

    pub fn handle(&self, intent: Intent) -> ProcessingOutcome {
        match intent {
            Intent::ExpenseAdded {
                conversation,
                person,
                amount,
            } => match self
                .store
                .record_contribution(&conversation, person.clone(), amount)
            {
                Ok(balance) => ProcessingOutcome::ExpenseAdded {
                    person,
                    amount,
                    balance,
                },
                Err(err) => ProcessingOutcome::Rejected(err),
            },
            Intent::ExpenseRemoved {
                conversation,
                person,
                amount,
            } => match self
                .store
                .remove_contribution(&conversation, person.as_str(), amount)
            {
                Ok(balance) => ProcessingOutcome::ExpenseRemoved {
                    person,
                    amount,
                    balance,
                },
                Err(err) => ProcessingOutcome::Rejected(err),
            },
            Intent::ParticipantRemoved {
                conversation,
                person,
            } => match self.store.remove_participant(&conversation, person.as_str()) {
                Ok(LedgerEntry {
                    person, balance, ..
                }) => ProcessingOutcome::ParticipantRemoved { person, balance },
                Err(err) => ProcessingOutcome::Rejected(err),
            },
            Intent::SplitRequested { conversation } => self.split(&conversation),
            Intent::ResetRequested { conversation } => {
                let removed = self.store.reset(&conversation);
                tracing::info!(conversation = %conversation, removed, "Ledger reset");
                ProcessingOutcome::Reset { removed }
            }
            Intent::StatusRequested { conversation } => {
                ProcessingOutcome::Status(self.store.list_entries(&conversation))
            }
        }
    }

    fn start_session(&self, conversation: &ConversationId) -> ProcessingOutcome {
        if self.store.list_entries(conversation).is_empty() {
            ProcessingOutcome::SessionStarted
        } else {
            ProcessingOutcome::SessionAlreadyRunning
        }
    }

    fn split(&self, conversation: &ConversationId) -> ProcessingOutcome {
        let entries = self.store.list_entries(conversation);
        match SettlementCalculator.calculate(&entries) {
            Ok(outcome) => ProcessingOutcome::Split(outcome),
            Err(SettlementError::NotEnoughParticipants { count }) => {
                ProcessingOutcome::NotEnoughParticipants { count }
            }
            Err(
                err @ (SettlementError::ImbalancedNet { .. }
                | SettlementError::AmountOutOfRange { .. }),
            ) => {
                tracing::error!(
                    conversation = %conversation,
                    member_count = entries.len(),
                    "Split aborted: {err}"
                );
                ProcessingOutcome::SplitFailed
            }
        }
    }
}
