//! Expense deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserID,
    expense::{ExpenseId, db::delete_expense},
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle expense deletion. Returns a success alert or an error alert.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(user_id, expense_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Expense deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingExpense) => Error::DeleteMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!("could not delete expense {expense_id} of user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        expense::{
            ExpenseCategory, ExpenseDetails, PaymentSource, create_expense,
            delete::DeleteExpenseState, delete_expense_endpoint, get_expenses,
        },
        money::Money,
        test_utils::{assert_status_ok, get_test_connection, insert_test_user},
    };

    #[tokio::test]
    async fn deletes_own_expense_only() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let intruder = insert_test_user("mallory", &connection);
        let expense = create_expense(
            user_id,
            &ExpenseDetails {
                category: ExpenseCategory::Food,
                amount: Money::from_cents(100),
                date_incurred: date!(2025 - 01 - 01),
                source: PaymentSource::Cash,
                description: None,
            },
            &connection,
        )
        .unwrap();
        let state = DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_expense_endpoint(State(state.clone()), Extension(intruder), Path(expense.id))
                .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            delete_expense_endpoint(State(state.clone()), Extension(user_id), Path(expense.id))
                .await;
        assert_status_ok(&response);
        let expenses = get_expenses(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(expenses.is_empty());
    }
}
