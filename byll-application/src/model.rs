use byll_domain::{ConversationId, LedgerEntry, LedgerError, Money, PersonName, SplitOutcome};

/// Ledger operation addressed to one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ExpenseAdded {
        conversation: ConversationId,
        person: PersonName,
        amount: Money,
    },
    ExpenseRemoved {
        conversation: ConversationId,
        person: PersonName,
        amount: Money,
    },
    ParticipantRemoved {
        conversation: ConversationId,
        person: PersonName,
    },
    SplitRequested {
        conversation: ConversationId,
    },
    ResetRequested {
        conversation: ConversationId,
    },
    StatusRequested {
        conversation: ConversationId,
    },
}

impl Intent {
    pub fn conversation(&self) -> &ConversationId {
        match self {
            Self::ExpenseAdded { conversation, .. }
            | Self::ExpenseRemoved { conversation, .. }
            | Self::ParticipantRemoved { conversation, .. }
            | Self::SplitRequested { conversation }
            | Self::ResetRequested { conversation }
            | Self::StatusRequested { conversation } => conversation,
        }
    }
}

/// Ledger operation as parsed from text, before it is bound to a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    AddExpense { person: PersonName, amount: Money },
    RemoveExpense { person: PersonName, amount: Money },
    RemoveParticipant { person: PersonName },
    Split,
    Reset,
    Status,
}

impl LedgerCommand {
    pub fn into_intent(self, conversation: ConversationId) -> Intent {
        match self {
            Self::AddExpense { person, amount } => Intent::ExpenseAdded {
                conversation,
                person,
                amount,
            },
            Self::RemoveExpense { person, amount } => Intent::ExpenseRemoved {
                conversation,
                person,
                amount,
            },
            Self::RemoveParticipant { person } => Intent::ParticipantRemoved {
                conversation,
                person,
            },
            Self::Split => Intent::SplitRequested { conversation },
            Self::Reset => Intent::ResetRequested { conversation },
            Self::Status => Intent::StatusRequested { conversation },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpPage {
    Basics,
    More,
}

/// Closed set of things a message can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ledger(LedgerCommand),
    Greeting,
    Help(HelpPage),
    StartSession,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    ExpenseAdded {
        person: PersonName,
        amount: Money,
        balance: Money,
    },
    ExpenseRemoved {
        person: PersonName,
        amount: Money,
        balance: Money,
    },
    ParticipantRemoved {
        person: PersonName,
        balance: Money,
    },
    Status(Vec<LedgerEntry>),
    Split(SplitOutcome),
    NotEnoughParticipants {
        count: usize,
    },
    /// The settlement hit an internal defect; nothing partial is reported.
    SplitFailed,
    Reset {
        removed: usize,
    },
    Rejected(LedgerError),
    Greeting,
    Help(HelpPage),
    SessionStarted,
    SessionAlreadyRunning,
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickReply {
    pub title: &'static str,
    pub payload: &'static str,
}

/// Text lines to send back, in order, plus optional quick replies attached to
/// the last line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quick_replies: Vec<QuickReply>,
}

impl Reply {
    pub fn text(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            quick_replies: Vec::new(),
        }
    }

    pub fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            quick_replies: Vec::new(),
        }
    }

    pub fn with_quick_replies(mut self, quick_replies: Vec<QuickReply>) -> Self {
        self.quick_replies = quick_replies;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::add(
        LedgerCommand::AddExpense { person: "A".into(), amount: Money::from_i64(3) },
        Intent::ExpenseAdded { conversation: "c".into(), person: "A".into(), amount: Money::from_i64(3) }
    )]
    #[case::remove_participant(
        LedgerCommand::RemoveParticipant { person: "A".into() },
        Intent::ParticipantRemoved { conversation: "c".into(), person: "A".into() }
    )]
    #[case::split(LedgerCommand::Split, Intent::SplitRequested { conversation: "c".into() })]
    #[case::reset(LedgerCommand::Reset, Intent::ResetRequested { conversation: "c".into() })]
    fn ledger_commands_bind_to_conversation(#[case] command: LedgerCommand, #[case] expected: Intent) {
        let intent = command.into_intent(ConversationId::from("c"));

        assert_eq!(intent.conversation().as_str(), "c");
        assert_eq!(intent, expected);
    }
}
