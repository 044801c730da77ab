use arcstr::ArcStr;
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

/// Opaque identifier of one conversation (one ledger scope).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConversationId(ArcStr);

impl ConversationId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Participant name. Case-sensitive, unique within one ledger.
#[derive(Clone, Debug)]
pub struct PersonName(ArcStr);

impl PersonName {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hash and Eq go through `str` so that `Borrow<str>` lookups stay consistent.
impl PartialEq for PersonName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for PersonName {}

impl Hash for PersonName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Borrow<str> for PersonName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);
    /// Euro cents.
    pub const CURRENCY_SCALE: u32 = 2;

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// `None` when the sum leaves the representable range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn round_to_currency(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(Self::CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

/// Rounded to cents; whole amounts are printed without decimals (`20`, `12.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_currency().0;
        if rounded.fract().is_zero() {
            write!(f, "{}", rounded.trunc().normalize())
        } else {
            let mut value = rounded;
            value.rescale(Self::CURRENCY_SCALE);
            write!(f, "{value}")
        }
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub conversation: ConversationId,
    pub person: PersonName,
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("no contribution recorded for '{person}'")]
    UnknownPerson { person: PersonName },
    #[error("cannot remove {requested} from '{person}', only {balance} was recorded")]
    InsufficientBalance {
        person: PersonName,
        balance: Money,
        requested: Money,
    },
    #[error("the balance of '{person}' would leave the supported range")]
    AmountOutOfRange { person: PersonName },
}

/// Net contributions of one conversation, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    balances: IndexMap<PersonName, Money>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the person's balance, creating the entry on first use.
    /// An out-of-range result leaves the ledger untouched.
    pub fn record(&mut self, person: PersonName, delta: Money) -> Result<Money, LedgerError> {
        let current = self.balance(person.as_str()).unwrap_or(Money::ZERO);
        let Some(balance) = current.checked_add(delta) else {
            return Err(LedgerError::AmountOutOfRange { person });
        };
        self.balances.insert(person, balance);
        Ok(balance)
    }

    /// Subtracts `delta` unless it exceeds what the person has recorded.
    pub fn remove(&mut self, person: &str, delta: Money) -> Result<Money, LedgerError> {
        let Some((_, name, balance)) = self.balances.get_full_mut(person) else {
            return Err(LedgerError::UnknownPerson {
                person: PersonName::from(person),
            });
        };

        if delta > *balance {
            return Err(LedgerError::InsufficientBalance {
                person: name.clone(),
                balance: *balance,
                requested: delta,
            });
        }

        let Some(remaining) = balance.checked_sub(delta) else {
            return Err(LedgerError::AmountOutOfRange {
                person: name.clone(),
            });
        };
        *balance = remaining;
        Ok(remaining)
    }

    pub fn remove_participant(&mut self, person: &str) -> Result<(PersonName, Money), LedgerError> {
        self.balances
            .shift_remove_entry(person)
            .ok_or_else(|| LedgerError::UnknownPerson {
                person: PersonName::from(person),
            })
    }

    pub fn balance(&self, person: &str) -> Option<Money> {
        self.balances.get(person).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PersonName, Money)> + '_ {
        self.balances.iter().map(|(person, balance)| (person, *balance))
    }

    pub fn snapshot(&self, conversation: &ConversationId) -> Vec<LedgerEntry> {
        self.entries()
            .map(|(person, balance)| LedgerEntry {
                conversation: conversation.clone(),
                person: person.clone(),
                balance,
            })
            .collect()
    }

    /// Drops every entry and returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.balances.len();
        self.balances.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: PersonName,
    pub to: PersonName,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Fair per-person share (the average balance).
    pub share: Money,
    pub transfers: Vec<Transfer>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Everyone already sits on the average.
    NoSplitNeeded { share: Money },
    Settle(Settlement),
}

impl SplitOutcome {
    pub fn share(&self) -> Money {
        match self {
            Self::NoSplitNeeded { share } => *share,
            Self::Settle(settlement) => settlement.share,
        }
    }

    pub fn transfers(&self) -> &[Transfer] {
        match self {
            Self::NoSplitNeeded { .. } => &[],
            Self::Settle(settlement) => &settlement.transfers,
        }
    }
}
