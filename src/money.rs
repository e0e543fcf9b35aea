//! Fixed-point amounts of money.
//!
//! Amounts are held as a whole number of cents so that sums and comparisons
//! are exact, and are stored in SQLite as an `INTEGER` column.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub},
    str::FromStr,
};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::Error;

/// The largest amount accepted from user input, 9,999,999,999.99.
const MAX_CENTS: i64 = 999_999_999_999;

/// An amount of money with at most two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero dollars.
    pub const ZERO: Money = Money(0);

    /// Create an amount from a decimal number.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::AmountPrecision] if `amount` has more than two decimal places,
    /// - [Error::AmountTooLarge] if the magnitude of `amount` is 10 billion or more.
    pub fn new(amount: Decimal) -> Result<Self, Error> {
        if amount.normalize().scale() > 2 {
            return Err(Error::AmountPrecision(amount.to_string()));
        }

        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .filter(|cents| cents.abs() <= MAX_CENTS)
            .ok_or_else(|| Error::AmountTooLarge(amount.to_string()))?;

        Ok(Self(cents))
    }

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a whole number of cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount as an exact decimal number.
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// The amount as a float, for display and charts only.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is more than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// The amount without its sign.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| Error::InvalidAmount(s.to_owned()))?;

        Money::new(amount)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_decimal().fmt(f)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money::from_cents)
    }
}

#[cfg(test)]
mod money_tests {
    use rust_decimal_macros::dec;

    use crate::{Error, money::Money};

    #[test]
    fn new_accepts_two_decimal_places() {
        let money = Money::new(dec!(12.34)).unwrap();

        assert_eq!(money.cents(), 1234);
    }

    #[test]
    fn new_accepts_trailing_zeros_beyond_two_places() {
        let money = Money::new(dec!(12.3400)).unwrap();

        assert_eq!(money.cents(), 1234);
    }

    #[test]
    fn new_rejects_three_decimal_places() {
        let result = Money::new(dec!(0.001));

        assert_eq!(result, Err(Error::AmountPrecision("0.001".to_owned())));
    }

    #[test]
    fn new_rejects_huge_amounts() {
        let result = Money::new(dec!(10000000000));

        assert!(matches!(result, Err(Error::AmountTooLarge(_))));
    }

    #[test]
    fn parse_rejects_amounts_that_overflow_a_decimal() {
        let result = "79228162514264337593543950335".parse::<Money>();

        assert_eq!(
            result,
            Err(Error::AmountTooLarge(
                "79228162514264337593543950335".to_owned()
            ))
        );
    }

    #[test]
    fn parse_trims_whitespace() {
        let money: Money = " 150 ".parse().unwrap();

        assert_eq!(money, Money::from_cents(15000));
    }

    #[test]
    fn parse_rejects_text() {
        let result = "ten dollars".parse::<Money>();

        assert_eq!(result, Err(Error::InvalidAmount("ten dollars".to_owned())));
    }

    #[test]
    fn display_always_shows_cents() {
        assert_eq!(Money::from_cents(10000).to_string(), "100.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }

    #[test]
    fn sum_is_exact() {
        let total: Money = [Money::from_cents(10), Money::from_cents(20)]
            .into_iter()
            .sum();

        assert_eq!(total, Money::from_cents(30));
    }
}
