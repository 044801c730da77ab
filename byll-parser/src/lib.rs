#![warn(clippy::uninlined_format_args)]

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, multispace1, one_of, space0},
    combinator::{opt, recognize, rest},
};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseKind {
    /// `paid` / `spent`
    Paid,
    /// `didn't pay` / `didn't spend`
    NotPaid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense<'a> {
    pub person: &'a str,
    pub kind: ExpenseKind,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Greeting,
    Help,
    MoreHelp,
    Start,
    Reset,
    Status,
    Split,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Expense(Expense<'a>),
    Keyword(Keyword),
    RemoveParticipant(&'a str),
    Unrecognized,
}

fn paid(input: &str) -> IResult<&str, ExpenseKind> {
    alt((tag_no_case("paid"), tag_no_case("spent")))
        .map(|_| ExpenseKind::Paid)
        .parse(input)
}

fn did_not_pay(input: &str) -> IResult<&str, ExpenseKind> {
    (
        tag_no_case("didn"),
        one_of("'’"),
        tag_no_case("t"),
        multispace1,
        alt((tag_no_case("pay"), tag_no_case("spend"))),
    )
        .map(|_| ExpenseKind::NotPaid)
        .parse(input)
}

fn euros(input: &str) -> IResult<&str, Decimal> {
    let (rest, digits) = recognize((digit1, opt((one_of(".,"), digit1)))).parse(input)?;
    let (rest, _) = (space0, char('€')).parse(rest)?;

    let amount = Decimal::from_str(&digits.replace(',', ".")).map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    Ok((rest, amount))
}

// " paid 20€", " didn't spend 3,50 €"; anything after the euro sign is ignored
fn verb_clause(input: &str) -> IResult<&str, (ExpenseKind, Decimal)> {
    (multispace1, alt((did_not_pay, paid)), multispace1, euros)
        .map(|(_, kind, _, amount)| (kind, amount))
        .parse(input)
}

/// `{person} paid {amount}€`, where the person is the shortest prefix that is
/// followed by a verb clause.
fn expense(input: &str) -> Option<Expense<'_>> {
    input
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .find_map(|(idx, _)| {
            let person = input[..idx].trim();
            if person.is_empty() {
                return None;
            }
            let (_, (kind, amount)) = verb_clause(&input[idx..]).ok()?;
            Some(Expense {
                person,
                kind,
                amount,
            })
        })
}

fn remove_participant(input: &str) -> IResult<&str, &str> {
    (tag_no_case("remove"), multispace1, rest)
        .map(|(_, _, name): (&str, &str, &str)| name.trim())
        .parse(input)
}

fn keyword(input: &str) -> Option<Keyword> {
    let normalized = input.to_lowercase();
    let keyword = match normalized.as_str() {
        "help" | "?" | "commands" => Keyword::Help,
        "help2" | "?2" => Keyword::MoreHelp,
        "start" | "begin" | "start recording" => Keyword::Start,
        "reset" | "fresh start" => Keyword::Reset,
        "status" | "stats" | "current" | "db" => Keyword::Status,
        "split the bill" | "split" | "results" => Keyword::Split,
        other => match other.trim_end_matches(['.', '!']) {
            "hi" | "hello" | "hey" | "good morning" | "good evening" | "good night" => {
                Keyword::Greeting
            }
            _ => return None,
        },
    };
    Some(keyword)
}

/// Parses one chat message. Never fails: unknown input is `Unrecognized`.
pub fn parse_message(input: &str) -> Statement<'_> {
    let input = input.trim();
    if input.is_empty() {
        return Statement::Unrecognized;
    }

    if let Some(expense) = expense(input) {
        return Statement::Expense(expense);
    }

    if let Some(keyword) = keyword(input) {
        return Statement::Keyword(keyword);
    }

    match remove_participant(input) {
        Ok((_, name)) if !name.is_empty() => Statement::RemoveParticipant(name),
        _ => Statement::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn expense_of<'a>(person: &'a str, kind: ExpenseKind, amount: &str) -> Statement<'a> {
        Statement::Expense(Expense {
            person,
            kind,
            amount: Decimal::from_str(amount).unwrap(),
        })
    }

    #[rstest]
    #[case::paid("Alice paid 20€", expense_of("Alice", ExpenseKind::Paid, "20"))]
    #[case::spent("Steve spent 0€", expense_of("Steve", ExpenseKind::Paid, "0"))]
    #[case::decimal_point("Mary paid 12.50€", expense_of("Mary", ExpenseKind::Paid, "12.50"))]
    #[case::decimal_comma("Mary paid 12,5€", expense_of("Mary", ExpenseKind::Paid, "12.5"))]
    #[case::space_before_euro("Bob paid 7 €", expense_of("Bob", ExpenseKind::Paid, "7"))]
    #[case::trailing_text(
        "Bob paid 7€ for pizza",
        expense_of("Bob", ExpenseKind::Paid, "7")
    )]
    #[case::multi_word_name(
        "John Smith paid 3€",
        expense_of("John Smith", ExpenseKind::Paid, "3")
    )]
    #[case::verb_case_insensitive("Ann PAID 4€", expense_of("Ann", ExpenseKind::Paid, "4"))]
    #[case::didnt_pay(
        "John didn't pay 10€",
        expense_of("John", ExpenseKind::NotPaid, "10")
    )]
    #[case::didnt_spend_typographic_apostrophe(
        "John didn’t spend 2.25€",
        expense_of("John", ExpenseKind::NotPaid, "2.25")
    )]
    #[case::surrounding_whitespace("  Eve paid 1€  ", expense_of("Eve", ExpenseKind::Paid, "1"))]
    fn parses_expenses(#[case] input: &str, #[case] expected: Statement<'_>) {
        assert_eq!(parse_message(input), expected);
    }

    #[rstest]
    #[case::no_currency("Alice paid 20")]
    #[case::no_amount("Alice paid €")]
    #[case::no_person("paid 20€")]
    #[case::other_verb("Alice owes 20€")]
    #[case::glued_verb("Alice paidx 20€")]
    #[case::empty("")]
    #[case::blank("   ")]
    #[case::chatter("what is this?")]
    #[case::remove_without_name("remove")]
    fn unrecognized_inputs(#[case] input: &str) {
        assert_eq!(parse_message(input), Statement::Unrecognized);
    }

    #[rstest]
    #[case("hi", Keyword::Greeting)]
    #[case("Hello!", Keyword::Greeting)]
    #[case("hi...", Keyword::Greeting)]
    #[case("Good Evening.", Keyword::Greeting)]
    #[case("help", Keyword::Help)]
    #[case("?", Keyword::Help)]
    #[case("COMMANDS", Keyword::Help)]
    #[case("help2", Keyword::MoreHelp)]
    #[case("?2", Keyword::MoreHelp)]
    #[case("start recording", Keyword::Start)]
    #[case("begin", Keyword::Start)]
    #[case("fresh start", Keyword::Reset)]
    #[case("reset", Keyword::Reset)]
    #[case("stats", Keyword::Status)]
    #[case("db", Keyword::Status)]
    #[case("Split the bill", Keyword::Split)]
    #[case("results", Keyword::Split)]
    fn parses_keywords(#[case] input: &str, #[case] expected: Keyword) {
        assert_eq!(parse_message(input), Statement::Keyword(expected));
    }

    #[rstest]
    #[case("Remove Steve", "Steve")]
    #[case("remove   Mary Jane ", "Mary Jane")]
    fn parses_participant_removal(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_message(input), Statement::RemoveParticipant(expected));
    }

    #[test]
    fn expense_wins_over_removal() {
        assert_eq!(
            parse_message("Remove Steve paid 5€"),
            expense_of("Remove Steve", ExpenseKind::Paid, "5")
        );
    }
}
