//! Income deletion endpoint.

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
    income::{IncomeId, db::delete_income},
};

/// The state needed for deleting income.
#[derive(Debug, Clone)]
pub struct DeleteIncomeState {
    /// The database connection for managing income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle income deletion. Returns a success alert or an error alert.
pub async fn delete_income_endpoint(
    State(state): State<DeleteIncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_income(user_id, income_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Income deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingIncome) => Error::DeleteMissingIncome.into_alert_response(),
        Err(error) => {
            tracing::error!("could not delete income {income_id} of user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_income_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        income::{
            IncomeDetails, IncomeType, create_income, delete::DeleteIncomeState,
            delete_income_endpoint, get_incomes,
        },
        money::Money,
        test_utils::{assert_status_ok, get_test_connection, insert_test_user},
    };

    #[tokio::test]
    async fn deletes_own_income_only() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let intruder = insert_test_user("mallory", &connection);
        let income = create_income(
            user_id,
            &IncomeDetails {
                income_type: IncomeType::Salary,
                amount: Money::from_cents(100),
                date_received: date!(2025 - 01 - 01),
                description: None,
            },
            &connection,
        )
        .unwrap();
        let state = DeleteIncomeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_income_endpoint(State(state.clone()), Extension(intruder), Path(income.id))
                .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            delete_income_endpoint(State(state.clone()), Extension(user_id), Path(income.id))
                .await;
        assert_status_ok(&response);
        let incomes = get_incomes(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(incomes.is_empty());
    }
}
