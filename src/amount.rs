//! Fixed-point money amounts stored as integer cents.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
    sync::OnceLock,
};

use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// An amount of money in euro with cent precision.
///
/// Amounts are kept as a whole number of cents so that sums never drift.
/// They are written to JSON as decimal strings with two decimal places, e.g. `"42.50"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Zero euro.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a number of cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parse user input as a non-negative amount.
    ///
    /// Surrounding whitespace is ignored. Inputs with more than two decimal
    /// places are rounded to the nearest cent, with halves rounded away from zero.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `text` is not a decimal number, is
    /// negative, or is too large to be stored.
    pub fn parse_non_negative(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidAmount(text.to_owned());

        let decimal = Decimal::from_str(text.trim()).map_err(|_| invalid())?;

        if decimal.is_sign_negative() && !decimal.is_zero() {
            return Err(invalid());
        }

        let cents = decimal
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .ok_or_else(invalid)?;

        Ok(Self(cents))
    }

    /// The amount as a decimal number with two decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Format the amount the Italian way, e.g. "1.250,50 €".
    pub fn format_euro(self) -> String {
        static FORMATTER: OnceLock<Formatter> = OnceLock::new();

        let formatter = FORMATTER.get_or_init(|| {
            Formatter::new()
                .separator('.')
                .expect("'.' is a valid thousands separator")
                .comma(true)
                .precision(Precision::Decimals(2))
        });

        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = Amount(self.0.saturating_abs())
            .to_decimal()
            .to_f64()
            .unwrap_or_default();

        // numfmt renders zero as "0".
        let mut formatted = if magnitude == 0.0 {
            "0".to_owned()
        } else {
            formatter.fmt_string(magnitude)
        };

        // numfmt drops trailing zeros from the decimals, e.g. 12.30 is "12,3" and 12.00 is "12".
        match formatted.rfind(',') {
            Some(comma) => {
                let decimals = formatted.len() - comma - 1;
                formatted.extend(std::iter::repeat_n('0', 2_usize.saturating_sub(decimals)));
            }
            None => formatted.push_str(",00"),
        }

        format!("{sign}{formatted} €")
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// An amount as sent by the client, either as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// e.g. `"42.50"`
    Text(String),
    /// e.g. `42.5`
    Number(serde_json::Number),
}

impl AmountInput {
    /// The raw input as text, ready for [Amount::parse_non_negative].
    pub fn as_text(&self) -> String {
        match self {
            AmountInput::Text(text) => text.clone(),
            AmountInput::Number(number) => number.to_string(),
        }
    }
}
