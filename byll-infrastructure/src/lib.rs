#![warn(clippy::uninlined_format_args)]

pub mod parser;
pub mod store;

pub use parser::ByllCommandParser;
pub use store::InMemoryLedgerStore;
