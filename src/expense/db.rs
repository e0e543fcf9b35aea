//! Database operations for expenses.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    expense::{Expense, ExpenseCategory, ExpenseDetails, ExpenseId},
    money::Money,
};

const EXPENSE_COLUMNS: &str =
    "id, user_id, category, amount, date_incurred, source, description";

/// Record an expense for `owner`.
pub fn create_expense(
    owner: UserID,
    details: &ExpenseDetails,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (user_id, category, amount, date_incurred, source, description)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            owner,
            details.category,
            details.amount,
            details.date_incurred,
            details.source,
            details.description.as_deref(),
        ),
    )?;

    Ok(Expense {
        id: connection.last_insert_rowid(),
        owner,
        category: details.category,
        amount: details.amount,
        date_incurred: details.date_incurred,
        source: details.source,
        description: details.description.clone(),
    })
}

/// Retrieve the expense `expense_id` owned by `owner`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expense does not exist or belongs to another user.
pub fn get_expense(
    owner: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_one((expense_id, owner), map_row)
        .map_err(Error::from)
}

/// Retrieve all of `owner`'s expenses, newest first.
pub fn get_expenses(owner: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    get_recent_expenses(owner, u32::MAX, connection)
}

/// Retrieve the `limit` most recent expenses of `owner`, newest first.
pub fn get_recent_expenses(
    owner: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE user_id = ?1
            ORDER BY date_incurred DESC, id DESC
            LIMIT ?2"
        ))?
        .query_map((owner, limit), map_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Replace the user-entered fields of the expense `expense_id` owned by `owner`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingExpense] if the expense does not exist or belongs to another user.
pub fn update_expense(
    owner: UserID,
    expense_id: ExpenseId,
    details: &ExpenseDetails,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense
        SET category = ?1, amount = ?2, date_incurred = ?3, source = ?4, description = ?5
        WHERE id = ?6 AND user_id = ?7",
        (
            details.category,
            details.amount,
            details.date_incurred,
            details.source,
            details.description.as_deref(),
            expense_id,
            owner,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete the expense `expense_id` owned by `owner`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingExpense] if the expense does not exist or belongs to another user.
pub fn delete_expense(
    owner: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (expense_id, owner),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// The sum of all of `owner`'s expenses.
pub fn get_total_expenses(owner: UserID, connection: &Connection) -> Result<Money, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expense WHERE user_id = ?1",
            [owner],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// The total of `owner`'s expenses in each category incurred on or after `since`.
///
/// Categories without any expenses in the period are left out.
pub fn get_expense_totals_by_category(
    owner: UserID,
    since: Date,
    connection: &Connection,
) -> Result<Vec<(ExpenseCategory, Money)>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount) FROM expense
            WHERE user_id = ?1 AND date_incurred >= ?2
            GROUP BY category
            ORDER BY SUM(amount) DESC, category",
        )?
        .query_map((owner, since), |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category TEXT NOT NULL DEFAULT 'OTHER',
            amount INTEGER NOT NULL CHECK (amount > 0),
            date_incurred TEXT NOT NULL,
            source TEXT NOT NULL,
            description TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(user_id, date_incurred);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
        date_incurred: row.get(4)?,
        source: row.get(5)?,
        description: row.get(6)?,
    })
}
