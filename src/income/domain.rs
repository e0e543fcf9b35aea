//! Income entries and the kinds of income a user can record.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::{
    auth::UserID,
    choice::{Choice, choice_from_sql},
    money::Money,
};

/// The ID of an income entry.
pub type IncomeId = i64;

/// Where income came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeType {
    /// Wages from an employer.
    Salary,
    /// Profit from a business the user runs.
    Business,
    /// Dividends, interest and other returns.
    Investment,
    /// Contract or gig work.
    Freelance,
    /// Rent from property.
    Rental,
    /// Anything else.
    Other,
}

impl Choice for IncomeType {
    const ALL: &'static [Self] = &[
        IncomeType::Salary,
        IncomeType::Business,
        IncomeType::Investment,
        IncomeType::Freelance,
        IncomeType::Rental,
        IncomeType::Other,
    ];

    fn code(self) -> &'static str {
        match self {
            IncomeType::Salary => "SALARY",
            IncomeType::Business => "BUSINESS",
            IncomeType::Investment => "INVESTMENT",
            IncomeType::Freelance => "FREELANCE",
            IncomeType::Rental => "RENTAL",
            IncomeType::Other => "OTHER",
        }
    }

    fn label(self) -> &'static str {
        match self {
            IncomeType::Salary => "Salary",
            IncomeType::Business => "Business",
            IncomeType::Investment => "Investment",
            IncomeType::Freelance => "Freelance",
            IncomeType::Rental => "Rental",
            IncomeType::Other => "Other",
        }
    }
}

impl Display for IncomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl ToSql for IncomeType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for IncomeType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        choice_from_sql(value)
    }
}

/// The fields of an income entry that the user enters.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeDetails {
    /// Where the income came from.
    pub income_type: IncomeType,
    /// How much was received, always positive.
    pub amount: Money,
    /// The day the income was received, never in the future.
    pub date_received: Date,
    /// An optional note from the user.
    pub description: Option<String>,
}

/// Income received by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    /// The ID of the entry.
    pub id: IncomeId,
    /// The user that received the income.
    pub owner: UserID,
    /// Where the income came from.
    pub income_type: IncomeType,
    /// How much was received.
    pub amount: Money,
    /// The day the income was received.
    pub date_received: Date,
    /// An optional note from the user.
    pub description: Option<String>,
}

#[cfg(test)]
mod income_type_tests {
    use crate::{choice::Choice, income::IncomeType};

    #[test]
    fn codes_round_trip() {
        for income_type in IncomeType::ALL {
            assert_eq!(IncomeType::from_code(income_type.code()), Ok(*income_type));
        }
    }

    #[test]
    fn displays_label() {
        assert_eq!(IncomeType::Freelance.to_string(), "Freelance");
    }
}
