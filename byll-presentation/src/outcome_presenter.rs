use byll_application::{HelpPage, ProcessingOutcome, QuickReply, Reply};
use byll_domain::{LedgerEntry, LedgerError, SplitOutcome};
use byll_i18n as i18n;

/// Payloads come back as message text, so they must parse as commands.
const GREETING_QUICK_REPLIES: [QuickReply; 3] = [
    QuickReply {
        title: i18n::QUICK_REPLY_HELP,
        payload: "help",
    },
    QuickReply {
        title: i18n::QUICK_REPLY_STATS,
        payload: "stats",
    },
    QuickReply {
        title: i18n::QUICK_REPLY_SPLIT,
        payload: "split the bill",
    },
];

pub struct OutcomePresenter;

impl OutcomePresenter {
    pub fn render(outcome: &ProcessingOutcome) -> Reply {
        match outcome {
            ProcessingOutcome::ExpenseAdded {
                person,
                amount,
                balance,
            } => Reply::lines(vec![
                i18n::expense_added(person, amount),
                i18n::current_status(person, balance),
            ]),
            ProcessingOutcome::ExpenseRemoved {
                person,
                amount,
                balance,
            } => Reply::lines(vec![
                i18n::expense_removed(person, amount),
                i18n::current_status(person, balance),
            ]),
            ProcessingOutcome::ParticipantRemoved { person, .. } => {
                Reply::text(i18n::participant_removed(person))
            }
            ProcessingOutcome::Status(entries) => Self::render_status(entries),
            ProcessingOutcome::Split(outcome) => Self::render_split(outcome),
            ProcessingOutcome::NotEnoughParticipants { .. } => Reply::text(i18n::NO_SPLIT_NEEDED),
            ProcessingOutcome::SplitFailed => Reply::text(i18n::SPLIT_FAILED),
            ProcessingOutcome::Reset { removed } => Reply::text(i18n::session_reset(*removed)),
            ProcessingOutcome::Rejected(err) => Self::render_rejection(err),
            ProcessingOutcome::Greeting => Self::greeting(),
            ProcessingOutcome::Help(HelpPage::Basics) => Reply::text(i18n::HELP),
            ProcessingOutcome::Help(HelpPage::More) => Reply::text(i18n::MORE_HELP),
            ProcessingOutcome::SessionStarted => Reply::text(i18n::SESSION_STARTED),
            ProcessingOutcome::SessionAlreadyRunning => Reply::text(i18n::SESSION_RUNNING),
            ProcessingOutcome::Unrecognized => Reply::text(i18n::NOT_UNDERSTOOD),
        }
    }

    pub fn greeting() -> Reply {
        Reply::text(i18n::WELCOME).with_quick_replies(GREETING_QUICK_REPLIES.to_vec())
    }

    pub fn attachments_unsupported() -> Reply {
        Reply::text(i18n::ATTACHMENTS_UNSUPPORTED)
    }

    pub fn authentication_successful() -> Reply {
        Reply::text(i18n::AUTHENTICATION_SUCCESSFUL)
    }

    fn render_status(entries: &[LedgerEntry]) -> Reply {
        if entries.is_empty() {
            return Reply::text(i18n::NOTHING_RECORDED);
        }
        Reply::lines(
            entries
                .iter()
                .map(|entry| i18n::status_line(&entry.person, entry.balance))
                .collect(),
        )
    }

    fn render_split(outcome: &SplitOutcome) -> Reply {
        match outcome {
            SplitOutcome::NoSplitNeeded { .. } => Reply::text(i18n::ALREADY_EVEN),
            SplitOutcome::Settle(settlement) => {
                let mut lines = Vec::with_capacity(settlement.transfers.len() + 1);
                lines.push(i18n::fair_share(settlement.share));
                lines.extend(
                    settlement
                        .transfers
                        .iter()
                        .map(|transfer| i18n::transfer_line(&transfer.from, &transfer.to, transfer.amount)),
                );
                Reply::lines(lines)
            }
        }
    }

    fn render_rejection(err: &LedgerError) -> Reply {
        match err {
            LedgerError::UnknownPerson { person } => Reply::text(i18n::unknown_person(person)),
            LedgerError::InsufficientBalance { person, .. } => {
                Reply::text(i18n::insufficient_balance(person))
            }
            LedgerError::AmountOutOfRange { person } => {
                Reply::text(i18n::amount_out_of_range(person))
            }
        }
    }
}
