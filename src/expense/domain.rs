//! Expenses, their categories and how they were paid for.

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

/// The ID of an expense.
pub type ExpenseId = i64;

/// What money was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Housing,
    Utilities,
    Healthcare,
    Entertainment,
    Education,
    Shopping,
    #[default]
    Other,
}

impl Choice for ExpenseCategory {
    const ALL: &'static [Self] = &[
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Housing,
        ExpenseCategory::Utilities,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Education,
        ExpenseCategory::Shopping,
        ExpenseCategory::Other,
    ];

    fn code(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "FOOD",
            ExpenseCategory::Transport => "TRANSPORT",
            ExpenseCategory::Housing => "HOUSING",
            ExpenseCategory::Utilities => "UTILITIES",
            ExpenseCategory::Healthcare => "HEALTHCARE",
            ExpenseCategory::Entertainment => "ENTERTAINMENT",
            ExpenseCategory::Education => "EDUCATION",
            ExpenseCategory::Shopping => "SHOPPING",
            ExpenseCategory::Other => "OTHER",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Other => "Other",
        }
    }
}

/// How an expense was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentSource {
    Cash,
    BankAccount,
    CreditCard,
    DigitalWallet,
    Other,
}

impl Choice for PaymentSource {
    const ALL: &'static [Self] = &[
        PaymentSource::Cash,
        PaymentSource::BankAccount,
        PaymentSource::CreditCard,
        PaymentSource::DigitalWallet,
        PaymentSource::Other,
    ];

    fn code(self) -> &'static str {
        match self {
            PaymentSource::Cash => "CASH",
            PaymentSource::BankAccount => "BANK_ACCOUNT",
            PaymentSource::CreditCard => "CREDIT_CARD",
            PaymentSource::DigitalWallet => "DIGITAL_WALLET",
            PaymentSource::Other => "OTHER",
        }
    }

    fn label(self) -> &'static str {
        match self {
            PaymentSource::Cash => "Cash",
            PaymentSource::BankAccount => "Bank Account",
            PaymentSource::CreditCard => "Credit Card",
            PaymentSource::DigitalWallet => "Digital Wallet",
            PaymentSource::Other => "Other",
        }
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Display for PaymentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl ToSql for ExpenseCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for ExpenseCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        choice_from_sql(value)
    }
}

impl ToSql for PaymentSource {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for PaymentSource {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        choice_from_sql(value)
    }
}

/// The fields of an expense that the user enters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDetails {
    /// What the money was spent on.
    pub category: ExpenseCategory,
    /// How much was spent, always positive.
    pub amount: Money,
    /// The day the money was spent, never in the future.
    pub date_incurred: Date,
    /// How the expense was paid for.
    pub source: PaymentSource,
    /// An optional note from the user.
    pub description: Option<String>,
}

/// Money spent by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The user that spent the money.
    pub owner: UserID,
    /// What the money was spent on.
    pub category: ExpenseCategory,
    /// How much was spent.
    pub amount: Money,
    /// The day the money was spent.
    pub date_incurred: Date,
    /// How the expense was paid for.
    pub source: PaymentSource,
    /// An optional note from the user.
    pub description: Option<String>,
}
