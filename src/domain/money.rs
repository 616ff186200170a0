//! Money codec: integer paise <-> decimal rupees.
//!
//! Every stored and compared amount is an integer number of paise. Rupees only
//! appear at the edges (UPI `am` parameter, display strings), backed by
//! rust_decimal so no binary floating-point drift leaks into the ledger.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of paise in one rupee.
pub const PAISE_PER_RUPEE: i64 = 100;

/// Convert a rupee amount to paise, rounding half away from zero.
///
/// Amounts outside the `i64` range saturate; callers pass trusted,
/// non-negative values.
pub fn rupees_to_paise(rupees: Decimal) -> i64 {
    let paise = (rupees * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    i64::try_from(paise).unwrap_or(if paise.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Convert paise to rupees. Exact: the result carries two decimal places.
pub fn paise_to_rupees(paise: i64) -> Decimal {
    Decimal::new(paise, 2)
}

/// Decimal rupee amount.
///
/// Serializes to a JSON number, like the amounts the mobile client sends.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Rupees(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rupees {
    pub fn new(value: Decimal) -> Self {
        Rupees(value)
    }

    pub fn from_paise(paise: i64) -> Self {
        Rupees(paise_to_rupees(paise))
    }

    /// Parse a rupee amount from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str(s.trim()).map(Rupees)
    }

    pub fn to_paise(&self) -> i64 {
        rupees_to_paise(self.0)
    }

    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Render with exactly two decimal places (`100.5` -> `"100.50"`).
    pub fn to_fixed_2(&self) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded.to_string()
    }
}

impl fmt::Display for Rupees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fixed_2())
    }
}

impl FromStr for Rupees {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<Decimal> for Rupees {
    fn from(value: Decimal) -> Self {
        Rupees(value)
    }
}

impl From<Rupees> for Decimal {
    fn from(value: Rupees) -> Self {
        value.0
    }
}

/// Format paise as a display string with Indian digit grouping,
/// e.g. `10000000` -> `"₹1,00,000"` and `123450` -> `"₹1,234.50"`.
///
/// Whole-rupee amounts drop the fractional part.
pub fn format_rupees(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    let whole = abs / PAISE_PER_RUPEE as u64;
    let fraction = abs % PAISE_PER_RUPEE as u64;

    let grouped = group_indian(&whole.to_string());
    if fraction == 0 {
        format!("{sign}₹{grouped}")
    } else {
        format!("{sign}₹{grouped}.{fraction:02}")
    }
}

/// Last three digits form the first group, then groups of two (lakh/crore).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
