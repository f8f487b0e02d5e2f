//! Money type for representing monetary values.
//!
//! Uses minor-unit integer representation to avoid floating-point
//! precision issues that plague monetary calculations. All arithmetic is
//! checked: overflow and currency mismatches yield `None` instead of a
//! wrong total.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    COP,
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    MXN,
}

impl Currency {
    /// Get the currency code (e.g., "COP").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::COP => "COP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::MXN => "MXN",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::COP => "$",
            Currency::USD => "US$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::MXN => "MX$",
        }
    }

    /// Get the number of decimal places for this currency.
    ///
    /// Peso prices are quoted in whole pesos.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::COP | Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "COP" => Some(Currency::COP),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "MXN" => Some(Currency::MXN),
            _ => None,
        }
    }

    fn minor_units_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (whole pesos for
/// COP, cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse a decimal price string (as served by the catalog) exactly.
    ///
    /// Extra precision is rounded half-to-even into the currency's minor unit.
    ///
    /// ```
    /// use cue_commerce::money::{Currency, Money};
    /// assert_eq!(Money::parse("1299.90", Currency::USD).unwrap().amount_cents, 129990);
    /// assert_eq!(Money::parse("50000", Currency::COP).unwrap().amount_cents, 50000);
    /// ```
    pub fn parse(amount: &str, currency: Currency) -> Result<Self, CommerceError> {
        let invalid = || CommerceError::InvalidPrice(amount.to_string());

        let decimal = Decimal::from_str(amount.trim()).map_err(|_| invalid())?;
        if decimal.is_sign_negative() && !decimal.is_zero() {
            return Err(invalid());
        }

        let minor = decimal
            .checked_mul(Decimal::from(currency.minor_units_per_major()))
            .ok_or(CommerceError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .ok_or(CommerceError::Overflow)?;

        Ok(Self::new(minor, currency))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Format as a display string (e.g., "$50000" or "US$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        if places == 0 {
            return format!("{sign}{abs}");
        }
        let divisor = self.currency.minor_units_per_major().unsigned_abs();
        format!(
            "{sign}{}.{:0places$}",
            abs / divisor,
            abs % divisor,
            places = places
        )
    }

    /// Try to add another Money value, returning None if currencies don't
    /// match or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values.
    ///
    /// Returns None on overflow or if any value is in another currency.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
