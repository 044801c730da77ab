use std::fmt::Display;

pub mod strings {
    pub const WELCOME: &str = "Hi! My name is Byll, I'm here to help you split your bills with your friends... Type 'help' to see the words I understand :)";
    pub const HELP: &str = "Type 'start' or 'begin' to start a new session. Record everyone's expenses and split the bill at the end. Add your friends by simply saying 'Mary paid 20€' or even 'Steve spent 0€'... When you're done, just 'split the bill'! ;) ('help2' for more)";
    pub const MORE_HELP: &str = "Remove someone with (for example) 'Remove Steve' and remove expenses with 'John didn't pay 10€'. Check the current status, and see how much money each user spent so far using 'stats' or 'current'. Delete everything and start over with 'reset' or 'fresh start'.";
    pub const SESSION_STARTED: &str =
        "I just started a new session :) Add users, or simply start adding expenses...";
    pub const SESSION_RUNNING: &str =
        "There's a session running already. Use 'reset' if you want to start over.";
    pub const NOTHING_RECORDED: &str =
        "Nobody has paid anything yet... Try 'Mary paid 20€' to add an expense.";
    pub const NO_SPLIT_NEEDED: &str = "No split needed...";
    pub const ALREADY_EVEN: &str = "Everyone paid the same amount, nobody owes anything :)";
    pub const SPLIT_FAILED: &str =
        "Something went wrong while splitting the bill. Nothing was changed, please try again.";
    pub const NOT_UNDERSTOOD: &str =
        "I'm not sure I understood that... Type 'help' to see the commands I understand.";
    pub const ATTACHMENTS_UNSUPPORTED: &str =
        "I can't process attachments... Type 'help' to see the commands I understand.";
    pub const AUTHENTICATION_SUCCESSFUL: &str = "Authentication successful";

    pub const QUICK_REPLY_HELP: &str = "Help";
    pub const QUICK_REPLY_STATS: &str = "Stats";
    pub const QUICK_REPLY_SPLIT: &str = "Split the bill";
}

pub use strings::*;

pub fn expense_added(person: impl Display, amount: impl Display) -> String {
    format!(
        "An expense was added to {person} for the value of {amount}€. To check current status use 'stats'."
    )
}

pub fn expense_removed(person: impl Display, amount: impl Display) -> String {
    format!(
        "I'll remove the expense of {person}, for the value of {amount}€. To check current status use 'stats'."
    )
}

pub fn participant_removed(person: impl Display) -> String {
    format!("{person} is no longer part of this bill.")
}

pub fn unknown_person(person: impl Display) -> String {
    format!("I don't think I know who {person} is.")
}

pub fn insufficient_balance(person: impl Display) -> String {
    format!("{person} never paid that much in the first place. Use another value.")
}

pub fn amount_out_of_range(person: impl Display) -> String {
    format!("That's more money than I can keep track of for {person}. Use another value.")
}

pub fn current_status(person: impl Display, balance: impl Display) -> String {
    format!("Current status for {person}: {balance}€")
}

pub fn status_line(person: impl Display, amount: impl Display) -> String {
    format!("{person} - paid {amount}€ (so far)")
}

pub fn fair_share(amount: impl Display) -> String {
    format!("Everyone should end up paying {amount}€.")
}

pub fn transfer_line(from: impl Display, to: impl Display, amount: impl Display) -> String {
    format!("{from} needs to pay {amount}€ to {to}")
}

pub fn session_reset(removed: usize) -> String {
    match removed {
        0 => "Fresh start! There was nothing to delete.".to_string(),
        1 => "Fresh start! I deleted 1 record.".to_string(),
        n => format!("Fresh start! I deleted {n} records."),
    }
}
