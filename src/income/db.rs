//! Database operations for income.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    income::{Income, IncomeDetails, IncomeId, IncomeType},
    money::Money,
};

const INCOME_COLUMNS: &str = "id, user_id, income_type, amount, date_received, description";

/// Record income for `owner`.
pub fn create_income(
    owner: UserID,
    details: &IncomeDetails,
    connection: &Connection,
) -> Result<Income, Error> {
    connection.execute(
        "INSERT INTO income (user_id, income_type, amount, date_received, description)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            owner,
            details.income_type,
            details.amount,
            details.date_received,
            details.description.as_deref(),
        ),
    )?;

    Ok(Income {
        id: connection.last_insert_rowid(),
        owner,
        income_type: details.income_type,
        amount: details.amount,
        date_received: details.date_received,
        description: details.description.clone(),
    })
}

/// Retrieve the income entry `income_id` owned by `owner`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the entry does not exist or belongs to another user.
pub fn get_income(
    owner: UserID,
    income_id: IncomeId,
    connection: &Connection,
) -> Result<Income, Error> {
    connection
        .prepare(&format!(
            "SELECT {INCOME_COLUMNS} FROM income WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_one((income_id, owner), map_row)
        .map_err(Error::from)
}

/// Retrieve all of `owner`'s income, newest first.
pub fn get_incomes(owner: UserID, connection: &Connection) -> Result<Vec<Income>, Error> {
    get_recent_incomes(owner, u32::MAX, connection)
}

/// Retrieve the `limit` most recent income entries of `owner`, newest first.
pub fn get_recent_incomes(
    owner: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    connection
        .prepare(&format!(
            "SELECT {INCOME_COLUMNS} FROM income WHERE user_id = ?1
            ORDER BY date_received DESC, id DESC
            LIMIT ?2"
        ))?
        .query_map((owner, limit), map_row)?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}

/// Replace the user-entered fields of the income entry `income_id` owned by `owner`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingIncome] if the entry does not exist or belongs to another user.
pub fn update_income(
    owner: UserID,
    income_id: IncomeId,
    details: &IncomeDetails,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE income
        SET income_type = ?1, amount = ?2, date_received = ?3, description = ?4
        WHERE id = ?5 AND user_id = ?6",
        (
            details.income_type,
            details.amount,
            details.date_received,
            details.description.as_deref(),
            income_id,
            owner,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingIncome);
    }

    Ok(())
}

/// Delete the income entry `income_id` owned by `owner`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingIncome] if the entry does not exist or belongs to another user.
pub fn delete_income(
    owner: UserID,
    income_id: IncomeId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM income WHERE id = ?1 AND user_id = ?2",
        (income_id, owner),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingIncome);
    }

    Ok(())
}

/// The sum of all of `owner`'s income.
pub fn get_total_income(owner: UserID, connection: &Connection) -> Result<Money, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM income WHERE user_id = ?1",
            [owner],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// The total of `owner`'s income of each type received on or after `since`.
///
/// Types without any income in the period are left out.
pub fn get_income_totals_by_type(
    owner: UserID,
    since: Date,
    connection: &Connection,
) -> Result<Vec<(IncomeType, Money)>, Error> {
    connection
        .prepare(
            "SELECT income_type, SUM(amount) FROM income
            WHERE user_id = ?1 AND date_received >= ?2
            GROUP BY income_type
            ORDER BY SUM(amount) DESC, income_type",
        )?
        .query_map((owner, since), |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}

/// Initialize the income table and indexes.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            income_type TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK (amount > 0),
            date_received TEXT NOT NULL,
            description TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_income_date ON income(user_id, date_received);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Income, rusqlite::Error> {
    Ok(Income {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        income_type: row.get(2)?,
        amount: row.get(3)?,
        date_received: row.get(4)?,
        description: row.get(5)?,
    })
}
