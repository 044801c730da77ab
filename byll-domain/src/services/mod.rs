pub mod settlement_calculator;

pub use settlement_calculator::{SETTLEMENT_EPSILON, SettlementCalculator, SettlementError};
