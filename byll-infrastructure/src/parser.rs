use byll_application::{Command, CommandParser, HelpPage, LedgerCommand};
use byll_domain::{Money, PersonName};
use byll_parser::{Expense, ExpenseKind, Keyword, Statement, parse_message};

#[derive(Default)]
pub struct ByllCommandParser;

fn expense_command(expense: Expense<'_>) -> LedgerCommand {
    let person = PersonName::from(expense.person);
    let amount = Money::from_decimal(expense.amount);
    match expense.kind {
        ExpenseKind::Paid => LedgerCommand::AddExpense { person, amount },
        ExpenseKind::NotPaid => LedgerCommand::RemoveExpense { person, amount },
    }
}

fn keyword_command(keyword: Keyword) -> Command {
    match keyword {
        Keyword::Greeting => Command::Greeting,
        Keyword::Help => Command::Help(HelpPage::Basics),
        Keyword::MoreHelp => Command::Help(HelpPage::More),
        Keyword::Start => Command::StartSession,
        Keyword::Reset => Command::Ledger(LedgerCommand::Reset),
        Keyword::Status => Command::Ledger(LedgerCommand::Status),
        Keyword::Split => Command::Ledger(LedgerCommand::Split),
    }
}

impl CommandParser for ByllCommandParser {
    fn parse(&self, text: &str) -> Command {
        match parse_message(text) {
            Statement::Expense(expense) => Command::Ledger(expense_command(expense)),
            Statement::Keyword(keyword) => keyword_command(keyword),
            Statement::RemoveParticipant(person) => {
                Command::Ledger(LedgerCommand::RemoveParticipant {
                    person: PersonName::from(person),
                })
            }
            Statement::Unrecognized => {
                tracing::debug!(text, "Message not recognized");
                Command::Unrecognized
            }
        }
    }
}
