//! The endpoint for recording an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::{
        ExpenseForm,
        db::create_expense,
        form::{FormAction, expense_form_view},
    },
    flash::{Flash, set_flash},
    form::ensure_not_future,
    timezone::local_today,
};

/// The state needed to record an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording an expense, redirects to the expenses page on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let details = match form.parse() {
        Ok(details) => details,
        Err(errors) => {
            return expense_form_view(FormAction::Create, &form, &errors, today).into_response();
        }
    };

    if let Err(error) = ensure_not_future(details.date_incurred, today) {
        return error.into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_expense(user_id, &details, &connection) {
        Ok(_) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            set_flash(jar, &Flash::Success("Expense added.".to_owned())),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not record expense for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State, http::StatusCode};
    use axum_extra::extract::PrivateCookieJar;
    use time::Duration;

    use crate::{
        app_state::create_cookie_key,
        auth::UserID,
        endpoints,
        expense::{
            ExpenseCategory, ExpenseForm, PaymentSource, create::CreateExpenseState,
            create_expense_endpoint, form::AMOUNT_NOT_POSITIVE, get_expenses,
        },
        flash::Flash,
        money::Money,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_status_ok, get_flash,
            get_test_connection, insert_test_user, must_get_form, parse_html_fragment,
        },
        timezone::local_today,
    };

    fn get_state() -> (CreateExpenseState, UserID) {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);

        let state = CreateExpenseState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, user_id)
    }

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    #[tokio::test]
    async fn records_expense() {
        let (state, user_id) = get_state();
        let today = local_today("Etc/UTC").unwrap();
        let form = ExpenseForm {
            category: Some("TRANSPORT".to_owned()),
            amount: Some("45.25".to_owned()),
            date_incurred: Some(today.to_string()),
            source: Some("CREDIT_CARD".to_owned()),
            description: Some("Train pass".to_owned()),
        };

        let response =
            create_expense_endpoint(State(state.clone()), Extension(user_id), get_jar(), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);
        assert_eq!(
            get_flash(&response, create_cookie_key("foobar")),
            Some(Flash::Success("Expense added.".to_owned()))
        );
        let expenses = get_expenses(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, ExpenseCategory::Transport);
        assert_eq!(expenses[0].amount, Money::from_cents(4_525));
        assert_eq!(expenses[0].source, PaymentSource::CreditCard);
        assert_eq!(expenses[0].description.as_deref(), Some("Train pass"));
    }

    #[tokio::test]
    async fn blank_category_is_recorded_as_other() {
        let (state, user_id) = get_state();
        let form = ExpenseForm {
            category: Some(String::new()),
            amount: Some("3.50".to_owned()),
            date_incurred: Some("2025-01-01".to_owned()),
            source: Some("CASH".to_owned()),
            description: None,
        };

        let response =
            create_expense_endpoint(State(state.clone()), Extension(user_id), get_jar(), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let expenses = get_expenses(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(expenses[0].category, ExpenseCategory::Other);
    }

    #[tokio::test]
    async fn rejects_future_date() {
        let (state, user_id) = get_state();
        let tomorrow = local_today("Etc/UTC").unwrap() + Duration::days(1);
        let form = ExpenseForm {
            category: Some("FOOD".to_owned()),
            amount: Some("100".to_owned()),
            date_incurred: Some(tomorrow.to_string()),
            source: Some("CASH".to_owned()),
            description: None,
        };

        let response =
            create_expense_endpoint(State(state.clone()), Extension(user_id), get_jar(), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let expenses = get_expenses(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn invalid_amount_returns_form_with_error() {
        let (state, user_id) = get_state();
        let form = ExpenseForm {
            category: Some("FOOD".to_owned()),
            amount: Some("-100".to_owned()),
            date_incurred: Some("2025-01-01".to_owned()),
            source: Some("CASH".to_owned()),
            description: None,
        };

        let response =
            create_expense_endpoint(State(state), Extension(user_id), get_jar(), Form(form)).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(&must_get_form(&html), AMOUNT_NOT_POSITIVE);
    }
}
