#![warn(clippy::uninlined_format_args)]

pub mod outcome_presenter;

pub use outcome_presenter::OutcomePresenter;
