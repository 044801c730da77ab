#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    ConversationId, Ledger, LedgerEntry, LedgerError, Money, PersonName, Settlement, SplitOutcome,
    Transfer,
};
pub use services::{SettlementCalculator, SettlementError};
