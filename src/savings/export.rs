//! Download a user's savings goals as CSV.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    csv_export::CsvDownload,
    savings::db::get_goals,
    timezone::get_local_offset,
};

const HEADERS: [&str; 5] = [
    "Goal Name",
    "Target Amount",
    "Saved Amount",
    "Start Date",
    "Target Date",
];

/// The state needed to export savings goals.
#[derive(Debug, Clone)]
pub struct ExportSavingsState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportSavingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with the user's savings goals as a CSV file, ordered by target date.
///
/// The start date is the day the goal was created in the local timezone.
pub async fn export_savings(
    State(state): State<ExportSavingsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goals = get_goals(user_id, &connection)?;
    let rows = goals.iter().map(|goal| {
        [
            goal.name.to_string(),
            goal.target_amount.to_string(),
            goal.current_amount.to_string(),
            goal.created_at.to_offset(offset).date().to_string(),
            goal.target_date.to_string(),
        ]
    });

    Ok(CsvDownload::new("savings.csv", &HEADERS, rows)?.into_response())
}
