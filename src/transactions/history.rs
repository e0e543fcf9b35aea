//! Merges income, expenses and savings goals into a single history.

use std::fmt::Display;

use rusqlite::Connection;
use time::{Date, UtcOffset};

use crate::{
    Error,
    auth::UserID,
    expense::{get_expenses, get_total_expenses},
    income::{get_incomes, get_total_income},
    money::Money,
    savings::{get_goals, get_savings_totals},
};

/// Where a transaction in the history came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
    Savings,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::Savings => "Savings",
        };

        f.write_str(label)
    }
}

/// One row of the transaction history.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub kind: TransactionKind,
    /// Money in is positive, money out is negative.
    pub amount: Money,
    pub description: String,
    pub category: String,
    pub date: Date,
}

/// Totals across the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransactionTotals {
    pub income: Money,
    /// Total spending as a positive amount.
    pub expenses: Money,
    pub savings: Money,
    /// What is left after spending and saving, may be negative.
    pub net_balance: Money,
}

impl TransactionTotals {
    pub fn new(income: Money, expenses: Money, savings: Money) -> Self {
        Self {
            income,
            expenses,
            savings,
            net_balance: income - expenses - savings,
        }
    }
}

/// Get every income, expense and savings goal of `owner` as one list, newest first.
///
/// Savings goals are dated on the day they were created in the timezone
/// with offset `local_offset`. Entries on the same day keep the order
/// income, savings, expenses.
pub fn get_transaction_history(
    owner: UserID,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let incomes = get_incomes(owner, connection)?
        .into_iter()
        .map(|income| Transaction {
            kind: TransactionKind::Income,
            amount: income.amount,
            description: income.income_type.to_string(),
            category: TransactionKind::Income.to_string(),
            date: income.date_received,
        });

    let goals = get_goals(owner, connection)?
        .into_iter()
        .map(|goal| Transaction {
            kind: TransactionKind::Savings,
            amount: goal.current_amount,
            description: goal.name.to_string(),
            category: TransactionKind::Savings.to_string(),
            date: goal.created_at.to_offset(local_offset).date(),
        });

    let expenses = get_expenses(owner, connection)?
        .into_iter()
        .map(|expense| Transaction {
            kind: TransactionKind::Expense,
            amount: -expense.amount,
            description: expense.description.unwrap_or_default(),
            category: expense.category.to_string(),
            date: expense.date_incurred,
        });

    let mut history: Vec<Transaction> = incomes.chain(goals).chain(expenses).collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(history)
}

/// Sum the income, expenses and savings of `owner`.
pub fn get_transaction_totals(
    owner: UserID,
    connection: &Connection,
) -> Result<TransactionTotals, Error> {
    let income = get_total_income(owner, connection)?;
    let expenses = get_total_expenses(owner, connection)?;
    let savings = get_savings_totals(owner, connection)?.total_saved;

    Ok(TransactionTotals::new(income, expenses, savings))
}
