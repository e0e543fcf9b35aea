//! Download the merged transaction history as CSV.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, auth::UserID, csv_export::CsvDownload, timezone::get_local_offset,
    transactions::history::get_transaction_history,
};

const HEADERS: [&str; 5] = ["Type", "Amount", "Description", "Category", "Date"];

#[derive(Debug, Clone)]
pub struct ExportTransactionsState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with the user's transaction history as a CSV file, newest first.
///
/// Expenses have negative amounts.
pub async fn export_transactions(
    State(state): State<ExportTransactionsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rows = get_transaction_history(user_id, local_offset, &connection)?
        .into_iter()
        .map(|transaction| {
            [
                transaction.kind.to_string(),
                transaction.amount.to_string(),
                transaction.description,
                transaction.category,
                transaction.date.to_string(),
            ]
        });

    Ok(CsvDownload::new("transactions.csv", &HEADERS, rows)?.into_response())
}

#[cfg(test)]
mod export_transactions_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use time::macros::{date, datetime};

    use crate::{
        expense::{ExpenseCategory, ExpenseDetails, PaymentSource, create_expense},
        money::Money,
        savings::{GoalDetails, GoalName, create_goal},
        test_utils::{
            assert_content_type, get_body_text, get_header, get_test_connection, insert_test_user,
        },
        transactions::{export::ExportTransactionsState, export_transactions},
    };

    #[tokio::test]
    async fn exports_signed_amounts() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        create_expense(
            user_id,
            &ExpenseDetails {
                category: ExpenseCategory::Healthcare,
                amount: Money::from_cents(8_000),
                date_incurred: date!(2025 - 05 - 10),
                source: PaymentSource::Cash,
                description: None,
            },
            &connection,
        )
        .unwrap();
        create_goal(
            user_id,
            &GoalDetails {
                name: GoalName::new_unchecked("Emergency Fund"),
                target_amount: Money::from_cents(1_000_000),
                target_date: date!(2026 - 05 - 01),
            },
            Money::from_cents(25_000),
            datetime!(2025 - 05 - 01 09:30 UTC),
            &connection,
        )
        .unwrap();
        let state = ExportTransactionsState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = export_transactions(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"transactions.csv\""
        );
        assert_eq!(
            get_body_text(response).await,
            "Type,Amount,Description,Category,Date\n\
            Expense,-80.00,,Healthcare,2025-05-10\n\
            Savings,250.00,Emergency Fund,Savings,2025-05-01\n"
        );
    }
}
