#![warn(clippy::uninlined_format_args)]

pub mod message_processor;
pub mod model;
pub mod ports;

pub use message_processor::MessageProcessor;
pub use model::{
    Command, HelpPage, Intent, LedgerCommand, ProcessingOutcome, QuickReply, Reply,
};
pub use ports::{CommandParser, LedgerStore, Notifier};
