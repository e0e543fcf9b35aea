//! Download a user's expenses as CSV.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, auth::UserID, csv_export::CsvDownload, expense::db::get_expenses};

const HEADERS: [&str; 5] = ["Category", "Amount", "Date", "Source", "Description"];

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportExpensesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with the user's expenses as a CSV file, newest first.
pub async fn export_expenses(
    State(state): State<ExportExpensesState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rows = get_expenses(user_id, &connection)?
        .into_iter()
        .map(|expense| {
            [
                expense.category.to_string(),
                expense.amount.to_string(),
                expense.date_incurred.to_string(),
                expense.source.to_string(),
                expense.description.unwrap_or_default(),
            ]
        });

    Ok(CsvDownload::new("expenses.csv", &HEADERS, rows)?.into_response())
}

#[cfg(test)]
mod export_expenses_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use time::macros::date;

    use crate::{
        expense::{
            ExpenseCategory, ExpenseDetails, PaymentSource, create_expense,
            export::ExportExpensesState, export_expenses,
        },
        money::Money,
        test_utils::{assert_content_type, get_body_text, get_test_connection, insert_test_user},
    };

    #[tokio::test]
    async fn exports_newest_first_with_source_labels() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let other_user = insert_test_user("bob", &connection);
        for (owner, category, cents, date_incurred, source, description) in [
            (
                user_id,
                ExpenseCategory::Food,
                2_450,
                date!(2025 - 03 - 02),
                PaymentSource::DigitalWallet,
                Some("Groceries, weekly"),
            ),
            (
                user_id,
                ExpenseCategory::Housing,
                90_000,
                date!(2025 - 03 - 01),
                PaymentSource::BankAccount,
                None,
            ),
            (
                other_user,
                ExpenseCategory::Shopping,
                100,
                date!(2025 - 03 - 05),
                PaymentSource::Cash,
                None,
            ),
        ] {
            create_expense(
                owner,
                &ExpenseDetails {
                    category,
                    amount: Money::from_cents(cents),
                    date_incurred,
                    source,
                    description: description.map(str::to_owned),
                },
                &connection,
            )
            .unwrap();
        }
        let state = ExportExpensesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = export_expenses(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_body_text(response).await,
            "Category,Amount,Date,Source,Description\n\
            Food,24.50,2025-03-02,Digital Wallet,\"Groceries, weekly\"\n\
            Housing,900.00,2025-03-01,Bank Account,\n"
        );
    }
}
