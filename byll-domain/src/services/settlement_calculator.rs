use crate::model::{LedgerEntry, Money, PersonName, Settlement, SplitOutcome, Transfer};
use rust_decimal::Decimal;

/// Nets within this distance of zero count as settled (one millionth of a euro).
pub const SETTLEMENT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    #[error("at least two participants are needed to split (found {count})")]
    NotEnoughParticipants { count: usize },
    /// Internal invariant violation: centered balances must cancel out.
    #[error("net balances do not cancel out (residue {residue})")]
    ImbalancedNet { residue: Decimal },
    /// Balances whose sum or spread does not fit in a `Decimal`.
    #[error("balances of {count} participants are too large to settle")]
    AmountOutOfRange { count: usize },
}

fn out_of_range(count: usize) -> SettlementError {
    tracing::error!(
        reject_reason = "amount_out_of_range",
        member_count = count,
        "Settlement rejected because the balances overflow the decimal range"
    );
    SettlementError::AmountOutOfRange { count }
}

struct Party<'a> {
    person: &'a PersonName,
    remaining: Decimal,
}

/// Index of the party with the largest remainder; ties go to the earliest one.
fn largest(parties: &[Party<'_>]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, party) in parties.iter().enumerate() {
        match best {
            Some(current) if parties[current].remaining >= party.remaining => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Settlement calculation service
///
/// Greedy largest-debtor/largest-creditor matching over balances centered on
/// their average. Produces at most `entries.len() - 1` transfers.
pub struct SettlementCalculator;

impl SettlementCalculator {
    /// Calculate the transfers that bring every participant to the average.
    ///
    /// # Arguments
    /// * `entries` - Ledger snapshot, in insertion order (used for tie-breaks)
    ///
    /// # Returns
    /// `NoSplitNeeded` when everyone already matches the average, otherwise the
    /// ordered transfer list with amounts rounded to cents.
    pub fn calculate(&self, entries: &[LedgerEntry]) -> Result<SplitOutcome, SettlementError> {
        if entries.len() < 2 {
            return Err(SettlementError::NotEnoughParticipants {
                count: entries.len(),
            });
        }

        let count = Decimal::from(entries.len());
        let total = entries
            .iter()
            .try_fold(Decimal::ZERO, |total, entry| {
                total.checked_add(entry.balance.as_decimal())
            })
            .ok_or_else(|| out_of_range(entries.len()))?;
        let average = total / count;
        let share = Money::from_decimal(average);

        let nets: Vec<(&PersonName, Decimal)> = entries
            .iter()
            .map(|entry| {
                entry
                    .balance
                    .as_decimal()
                    .checked_sub(average)
                    .map(|net| (&entry.person, net))
            })
            .collect::<Option<_>>()
            .ok_or_else(|| out_of_range(entries.len()))?;

        let residue = nets
            .iter()
            .try_fold(Decimal::ZERO, |residue, (_, net)| residue.checked_add(*net))
            .ok_or_else(|| out_of_range(entries.len()))?;
        if residue.abs() > SETTLEMENT_EPSILON {
            tracing::error!(
                reject_reason = "net_imbalance",
                member_count = entries.len(),
                epsilon = %SETTLEMENT_EPSILON,
                residue = %residue,
                "Settlement rejected because centered balances do not cancel out"
            );
            return Err(SettlementError::ImbalancedNet { residue });
        }

        let mut creditors: Vec<Party<'_>> = nets
            .iter()
            .filter(|(_, net)| *net > SETTLEMENT_EPSILON)
            .map(|&(person, net)| Party {
                person,
                remaining: net,
            })
            .collect();
        let mut debtors: Vec<Party<'_>> = nets
            .iter()
            .filter(|(_, net)| *net < -SETTLEMENT_EPSILON)
            .map(|&(person, net)| Party {
                person,
                remaining: -net,
            })
            .collect();

        let mut transfers = Vec::with_capacity(entries.len() - 1);
        while let (Some(debtor), Some(creditor)) = (largest(&debtors), largest(&creditors)) {
            let amount = debtors[debtor].remaining.min(creditors[creditor].remaining);
            debtors[debtor].remaining -= amount;
            creditors[creditor].remaining -= amount;

            let rounded = Money::from_decimal(amount).round_to_currency();
            if !rounded.is_zero() {
                transfers.push(Transfer {
                    from: debtors[debtor].person.clone(),
                    to: creditors[creditor].person.clone(),
                    amount: rounded,
                });
            }

            // `Vec::remove` keeps the remaining parties in insertion order.
            if debtors[debtor].remaining <= SETTLEMENT_EPSILON {
                debtors.remove(debtor);
            }
            if creditors[creditor].remaining <= SETTLEMENT_EPSILON {
                creditors.remove(creditor);
            }
        }

        // Members skipped as already settled may leave up to epsilon each behind.
        let tolerance = SETTLEMENT_EPSILON * count;
        if let Some(leftover) = debtors
            .iter()
            .chain(&creditors)
            .map(|party| party.remaining)
            .find(|remaining| *remaining > tolerance)
        {
            tracing::error!(
                reject_reason = "unmatched_remainder",
                member_count = entries.len(),
                tolerance = %tolerance,
                leftover = %leftover,
                "Settlement rejected because a remainder could not be matched"
            );
            return Err(SettlementError::ImbalancedNet { residue: leftover });
        }

        debug_assert!(transfers.len() < entries.len());
        tracing::debug!(
            member_count = entries.len(),
            share = %share,
            transfer_count = transfers.len(),
            "Settlement calculated"
        );

        if transfers.is_empty() {
            return Ok(SplitOutcome::NoSplitNeeded { share });
        }

        Ok(SplitOutcome::Settle(Settlement { share, transfers }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConversationId;
    use rstest::{fixture, rstest};

    #[fixture]
    fn calculator() -> SettlementCalculator {
        SettlementCalculator
    }

    fn entries(balances: &[(&str, Money)]) -> Vec<LedgerEntry> {
        let conversation = ConversationId::from("conversation");
        balances
            .iter()
            .map(|(person, balance)| LedgerEntry {
                conversation: conversation.clone(),
                person: PersonName::from(*person),
                balance: *balance,
            })
            .collect()
    }

    fn euros(value: i64) -> Money {
        Money::from_i64(value)
    }

    #[rstest]
    #[case::largest_debtor_pays_largest_creditor_first(
        &[("A", euros(30)), ("B", euros(10)), ("C", euros(-40))],
        vec![("C", "A", euros(30)), ("C", "B", euros(10))]
    )]
    #[case::two_participants(
        &[("A", euros(50)), ("B", euros(10))],
        vec![("B", "A", euros(20))]
    )]
    #[case::one_payer_covers_everyone(
        &[("A", euros(60)), ("B", euros(0)), ("C", euros(0))],
        vec![("B", "A", euros(20)), ("C", "A", euros(20))]
    )]
    #[case::ties_follow_insertion_order(
        &[("A", euros(40)), ("B", euros(40)), ("C", euros(0)), ("D", euros(0))],
        vec![("C", "A", euros(20)), ("D", "B", euros(20))]
    )]
    #[case::several_debtors_one_creditor(
        &[("A", euros(0)), ("B", euros(10)), ("C", euros(20)), ("D", euros(90))],
        vec![("A", "D", euros(30)), ("B", "D", euros(20)), ("C", "D", euros(10))]
    )]
    #[case::creditor_switches_when_surplus_drops(
        &[("A", euros(100)), ("B", euros(50)), ("C", euros(0)), ("D", euros(-30))],
        vec![("D", "A", euros(60)), ("C", "B", euros(20)), ("C", "A", euros(10))]
    )]
    #[case::thirds_are_rounded_to_cents(
        &[("A", euros(100)), ("B", euros(0)), ("C", euros(0))],
        vec![("B", "A", Money::new(3333, 2)), ("C", "A", Money::new(3333, 2))]
    )]
    #[case::cents_in_balances(
        &[("A", Money::new(1250, 2)), ("B", Money::new(750, 2))],
        vec![("B", "A", Money::new(250, 2))]
    )]
    fn settlement_calculator_cases(
        calculator: SettlementCalculator,
        #[case] balances: &[(&str, Money)],
        #[case] expected: Vec<(&str, &str, Money)>,
    ) {
        let outcome = calculator.calculate(&entries(balances)).unwrap();

        let expected: Vec<Transfer> = expected
            .into_iter()
            .map(|(from, to, amount)| Transfer {
                from: from.into(),
                to: to.into(),
                amount,
            })
            .collect();
        assert_eq!(outcome.transfers(), expected.as_slice());
        assert!(outcome.transfers().len() < balances.len());
    }

    #[rstest]
    #[case::equal_balances(&[("A", euros(10)), ("B", euros(10))], euros(10))]
    #[case::all_zero(&[("A", euros(0)), ("B", euros(0)), ("C", euros(0))], euros(0))]
    #[case::negative_but_equal(&[("A", euros(-5)), ("B", euros(-5))], euros(-5))]
    fn no_split_needed_cases(
        calculator: SettlementCalculator,
        #[case] balances: &[(&str, Money)],
        #[case] share: Money,
    ) {
        let outcome = calculator.calculate(&entries(balances)).unwrap();

        assert_eq!(outcome, SplitOutcome::NoSplitNeeded { share });
        assert!(outcome.transfers().is_empty());
    }

    #[rstest]
    #[case::single(&[("A", euros(50))], 1)]
    #[case::empty(&[], 0)]
    fn not_enough_participants_cases(
        calculator: SettlementCalculator,
        #[case] balances: &[(&str, Money)],
        #[case] count: usize,
    ) {
        assert_eq!(
            calculator.calculate(&entries(balances)),
            Err(SettlementError::NotEnoughParticipants { count })
        );
    }

    #[rstest]
    fn sub_epsilon_differences_are_settled(calculator: SettlementCalculator) {
        let outcome = calculator
            .calculate(&entries(&[
                ("A", Money::new(10_000_0001, 7)),
                ("B", Money::new(10_000_0000, 7)),
            ]))
            .unwrap();

        assert!(matches!(outcome, SplitOutcome::NoSplitNeeded { .. }));
    }

    #[rstest]
    fn sub_cent_differences_emit_no_transfer(calculator: SettlementCalculator) {
        let outcome = calculator
            .calculate(&entries(&[("A", Money::new(1001, 3)), ("B", euros(1))]))
            .unwrap();

        assert!(outcome.transfers().is_empty());
    }

    #[rstest]
    fn same_snapshot_gives_same_transfers(calculator: SettlementCalculator) {
        let snapshot = entries(&[
            ("A", euros(13)),
            ("B", euros(7)),
            ("C", euros(7)),
            ("D", euros(-2)),
            ("E", euros(0)),
        ]);

        let first = calculator.calculate(&snapshot).unwrap();
        let second = calculator.calculate(&snapshot).unwrap();

        assert_eq!(first, second);
    }

    fn huge(value: &str) -> Money {
        value.parse().unwrap()
    }

    #[rstest]
    fn imprecise_average_aborts_the_split(calculator: SettlementCalculator) {
        // The average of these needs more digits than a `Decimal` holds.
        let outcome = calculator.calculate(&entries(&[
            ("A", huge("1000000000000000000000000000")),
            ("B", huge("1000000000000000000000000000")),
            ("C", huge("1000000000000000000000000001")),
        ]));

        assert!(
            matches!(outcome, Err(SettlementError::ImbalancedNet { .. })),
            "got {outcome:?}"
        );
    }

    #[rstest]
    #[case::total_overflows(&[
        ("A", huge("79228162514264337593543950335")),
        ("B", huge("79228162514264337593543950335")),
    ])]
    #[case::spread_overflows(&[
        ("A", huge("79228162514264337593543950335")),
        ("B", huge("-79228162514264337593543950335")),
        ("C", huge("-79228162514264337593543950335")),
    ])]
    fn balances_past_the_decimal_range_abort_the_split(
        calculator: SettlementCalculator,
        #[case] balances: &[(&str, Money)],
    ) {
        assert_eq!(
            calculator.calculate(&entries(balances)),
            Err(SettlementError::AmountOutOfRange {
                count: balances.len()
            })
        );
    }

    #[rstest]
    fn share_is_the_average(calculator: SettlementCalculator) {
        let outcome = calculator
            .calculate(&entries(&[("A", euros(30)), ("B", euros(10)), ("C", euros(-40))]))
            .unwrap();

        assert_eq!(outcome.share(), euros(0));
    }
}
