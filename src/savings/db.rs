//! Database operations for savings goals.
//!
//! Every query is scoped to the goal's owner, so a user can never read or
//! change another user's goals by guessing an ID.

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    money::Money,
    savings::{GoalDetails, GoalId, GoalName, SavingsGoal, SavingsTotals},
};

const GOAL_COLUMNS: &str =
    "id, user_id, name, target_amount, current_amount, target_date, created_at";

/// Create a goal for `owner` with `current_amount` already saved.
///
/// # Errors
///
/// Returns [Error::DuplicateGoalName] if `owner` already has a goal with the same name.
pub fn create_goal(
    owner: UserID,
    details: &GoalDetails,
    current_amount: Money,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection.execute(
        "INSERT INTO savings_goal
            (user_id, name, target_amount, current_amount, target_date, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            owner,
            details.name.as_ref(),
            details.target_amount,
            current_amount,
            details.target_date,
            created_at,
        ),
    )?;

    Ok(SavingsGoal {
        id: connection.last_insert_rowid(),
        owner,
        name: details.name.clone(),
        target_amount: details.target_amount,
        current_amount,
        target_date: details.target_date,
        created_at,
    })
}

/// Retrieve the goal `goal_id` owned by `owner`.
///
/// # Errors
///
/// Returns [Error::MissingGoal] if the goal does not exist or belongs to another user.
pub fn get_goal(
    owner: UserID,
    goal_id: GoalId,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM savings_goal WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((goal_id, owner), map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::MissingGoal,
            error => error.into(),
        })
}

/// Retrieve the goal named `name` owned by `owner`, if there is one.
pub fn get_goal_by_name(
    owner: UserID,
    name: &GoalName,
    connection: &Connection,
) -> Result<Option<SavingsGoal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM savings_goal WHERE user_id = ?1 AND name = ?2"
        ))?
        .query_row((owner, name.as_ref()), map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all of `owner`'s goals, soonest target date first.
pub fn get_goals(owner: UserID, connection: &Connection) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM savings_goal
            WHERE user_id = ?1
            ORDER BY target_date ASC, id ASC"
        ))?
        .query_map([owner], map_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Retrieve up to `limit` of `owner`'s goals, soonest target date first.
pub fn get_goals_by_target_date(
    owner: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM savings_goal
            WHERE user_id = ?1
            ORDER BY target_date ASC, id ASC
            LIMIT ?2"
        ))?
        .query_map((owner, limit), map_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the name, amounts and target date of `goal`.
///
/// The owner and creation time are never changed.
///
/// # Errors
///
/// Returns [Error::MissingGoal] if the goal does not exist or belongs to another user,
/// or [Error::DuplicateGoalName] if the new name is used by another of the owner's goals.
pub fn update_goal(goal: &SavingsGoal, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE savings_goal
        SET name = ?1, target_amount = ?2, current_amount = ?3, target_date = ?4
        WHERE id = ?5 AND user_id = ?6",
        (
            goal.name.as_ref(),
            goal.target_amount,
            goal.current_amount,
            goal.target_date,
            goal.id,
            goal.owner,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::MissingGoal);
    }

    Ok(())
}

/// Delete the goal `goal_id` owned by `owner`.
///
/// # Errors
///
/// Returns [Error::DeleteMissingGoal] if the goal does not exist or belongs to another user.
pub fn delete_goal(owner: UserID, goal_id: GoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM savings_goal WHERE id = ?1 AND user_id = ?2",
        (goal_id, owner),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

/// Delete the goal named `name` owned by `owner`, returning whether a goal was deleted.
pub fn delete_goal_by_name(
    owner: UserID,
    name: &GoalName,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM savings_goal WHERE user_id = ?1 AND name = ?2",
        (owner, name.as_ref()),
    )?;

    Ok(rows_affected > 0)
}

/// Sum the targets and saved amounts of all of `owner`'s goals.
pub fn get_savings_totals(owner: UserID, connection: &Connection) -> Result<SavingsTotals, Error> {
    let (total_target, total_saved) = connection.query_row(
        "SELECT COALESCE(SUM(target_amount), 0), COALESCE(SUM(current_amount), 0)
        FROM savings_goal WHERE user_id = ?1",
        [owner],
        |row| Ok((row.get::<_, Money>(0)?, row.get::<_, Money>(1)?)),
    )?;

    Ok(SavingsTotals::new(total_target, total_saved))
}

/// Initialize the savings goal table and indexes.
pub fn create_savings_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS savings_goal (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            target_amount INTEGER NOT NULL CHECK (target_amount > 0),
            current_amount INTEGER NOT NULL,
            target_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, name),
            CHECK (current_amount >= 0 AND current_amount <= target_amount)
        );

        CREATE INDEX IF NOT EXISTS idx_savings_goal_target_date
            ON savings_goal(user_id, target_date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(SavingsGoal {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        name: GoalName::new_unchecked(&raw_name),
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        target_date: row.get(5)?,
        created_at: row.get(6)?,
    })
}
