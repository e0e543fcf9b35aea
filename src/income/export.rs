//! Download a user's income as CSV.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, auth::UserID, csv_export::CsvDownload, income::db::get_incomes};

const HEADERS: [&str; 4] = ["Type", "Amount", "Date", "Description"];

/// The state needed to export income.
#[derive(Debug, Clone)]
pub struct ExportIncomeState {
    /// The database connection for reading income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with the user's income as a CSV file, newest first.
pub async fn export_income(
    State(state): State<ExportIncomeState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let incomes = get_incomes(user_id, &connection)?;
    let rows = incomes.into_iter().map(|income| {
        [
            income.income_type.to_string(),
            income.amount.to_string(),
            income.date_received.to_string(),
            income.description.unwrap_or_default(),
        ]
    });

    Ok(CsvDownload::new("income.csv", &HEADERS, rows)?.into_response())
}

#[cfg(test)]
mod export_income_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use time::macros::date;

    use crate::{
        income::{
            IncomeDetails, IncomeType, create_income, export::ExportIncomeState, export_income,
        },
        money::Money,
        test_utils::{assert_content_type, get_body_text, get_test_connection, insert_test_user},
    };

    #[tokio::test]
    async fn exports_newest_first() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        for (income_type, cents, date_received, description) in [
            (IncomeType::Salary, 250_000, date!(2025 - 01 - 15), None),
            (IncomeType::Investment, 1_005, date!(2025 - 02 - 01), Some("Dividend")),
        ] {
            create_income(
                user_id,
                &IncomeDetails {
                    income_type,
                    amount: Money::from_cents(cents),
                    date_received,
                    description: description.map(str::to_owned),
                },
                &connection,
            )
            .unwrap();
        }
        let state = ExportIncomeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = export_income(State(state), Extension(user_id)).await.unwrap();

        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_body_text(response).await,
            "Type,Amount,Date,Description\n\
            Investment,10.05,2025-02-01,Dividend\n\
            Salary,2500.00,2025-01-15,\n"
        );
    }
}
