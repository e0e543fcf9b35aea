//! Expense editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::{
        ExpenseErrors, ExpenseForm, ExpenseId,
        db::{get_expense, update_expense},
        form::{FormAction, expense_form_view},
    },
    flash::{Flash, set_flash},
    form::ensure_not_future,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the edit expense page and endpoint.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing an expense entry.
pub async fn get_edit_expense_page(
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(user_id, expense_id, &connection)?;

    Ok(edit_expense_view(expense_id, &ExpenseForm::from_expense(&expense), today).into_response())
}

/// Handle the edit expense form.
pub async fn update_expense_endpoint(
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
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
            return expense_form_view(FormAction::Edit(expense_id), &form, &errors, today)
                .into_response();
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

    match update_expense(user_id, expense_id, &details, &connection) {
        Ok(()) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            set_flash(jar, &Flash::Success("Expense updated.".to_owned())),
        )
            .into_response(),
        Err(Error::UpdateMissingExpense) => Error::UpdateMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!("could not update expense {expense_id} of user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_expense_view(expense_id: ExpenseId, form: &ExpenseForm, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let form = expense_form_view(
        FormAction::Edit(expense_id),
        form,
        &ExpenseErrors::default(),
        today,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Edit Expense" }
                (form)
            }
        }
    };

    base("Edit Expense", &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod edit_expense_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::PrivateCookieJar;
    use time::macros::date;

    use crate::{
        Error,
        app_state::create_cookie_key,
        auth::UserID,
        endpoints::{self, format_endpoint},
        expense::{
            Expense, ExpenseCategory, ExpenseDetails, ExpenseForm, PaymentSource, create_expense,
            edit::EditExpenseState, get_edit_expense_page, get_expense, update_expense_endpoint,
        },
        money::Money,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_hx_redirect,
            assert_status_ok, assert_valid_html, get_selected_option, get_test_connection,
            insert_test_user, must_get_form, parse_html_document,
        },
    };

    fn setup() -> (EditExpenseState, UserID, Expense) {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let expense = create_expense(
            user_id,
            &ExpenseDetails {
                category: ExpenseCategory::Housing,
                amount: Money::from_cents(80_000),
                date_incurred: date!(2025 - 02 - 01),
                source: PaymentSource::BankAccount,
                description: Some("Rent".to_owned()),
            },
            &connection,
        )
        .unwrap();

        let state = EditExpenseState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, user_id, expense)
    }

    #[tokio::test]
    async fn edit_page_is_prefilled() {
        let (state, user_id, expense) = setup();

        let response = get_edit_expense_page(State(state), Extension(user_id), Path(expense.id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, &format_endpoint(endpoints::EXPENSE, expense.id), "hx-put");
        assert_eq!(
            get_selected_option(&form, "category"),
            Some("HOUSING".to_owned())
        );
        assert_eq!(
            get_selected_option(&form, "source"),
            Some("BANK_ACCOUNT".to_owned())
        );
        assert_form_input_with_value(&form, "amount", "number", "800.00");
        assert_form_input_with_value(&form, "date_incurred", "date", "2025-02-01");
    }

    #[tokio::test]
    async fn edit_page_for_missing_expense_is_not_found() {
        let (state, user_id, _) = setup();

        let error = get_edit_expense_page(State(state), Extension(user_id), Path(999))
            .await
            .unwrap_err();

        assert_eq!(error, Error::NotFound);
    }

    #[tokio::test]
    async fn updates_expense() {
        let (state, user_id, expense) = setup();
        let form = ExpenseForm {
            category: Some("UTILITIES".to_owned()),
            amount: Some("12.34".to_owned()),
            date_incurred: Some("2025-02-03".to_owned()),
            source: Some("DIGITAL_WALLET".to_owned()),
            description: None,
        };

        let response = update_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Path(expense.id),
            PrivateCookieJar::new(create_cookie_key("foobar")),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);
        let got = get_expense(user_id, expense.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.category, ExpenseCategory::Utilities);
        assert_eq!(got.amount, Money::from_cents(1_234));
        assert_eq!(got.source, PaymentSource::DigitalWallet);
        assert_eq!(got.description, None);
    }

    #[tokio::test]
    async fn cannot_update_another_users_expense() {
        let (state, _, expense) = setup();
        let intruder = insert_test_user("mallory", &state.db_connection.lock().unwrap());
        let form = ExpenseForm {
            category: Some("UTILITIES".to_owned()),
            amount: Some("12.34".to_owned()),
            date_incurred: Some("2025-02-03".to_owned()),
            source: Some("DIGITAL_WALLET".to_owned()),
            description: None,
        };

        let response = update_expense_endpoint(
            State(state),
            Extension(intruder),
            Path(expense.id),
            PrivateCookieJar::new(create_cookie_key("foobar")),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
