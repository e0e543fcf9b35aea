//! Income editing page and endpoint.

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
    flash::{Flash, set_flash},
    form::ensure_not_future,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    income::{
        IncomeErrors, IncomeForm, IncomeId,
        db::{get_income, update_income},
        form::{FormAction, income_form_view},
    },
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the edit income page and endpoint.
#[derive(Debug, Clone)]
pub struct EditIncomeState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing an income entry.
pub async fn get_edit_income_page(
    State(state): State<EditIncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let income = get_income(user_id, income_id, &connection)?;

    Ok(edit_income_view(income_id, &IncomeForm::from_income(&income), today).into_response())
}

/// Handle the edit income form.
pub async fn update_income_endpoint(
    State(state): State<EditIncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
    jar: PrivateCookieJar,
    Form(form): Form<IncomeForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let details = match form.parse() {
        Ok(details) => details,
        Err(errors) => {
            return income_form_view(FormAction::Edit(income_id), &form, &errors, today)
                .into_response();
        }
    };

    if let Err(error) = ensure_not_future(details.date_received, today) {
        return error.into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_income(user_id, income_id, &details, &connection) {
        Ok(()) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::INCOME_VIEW.to_owned()),
            set_flash(jar, &Flash::Success("Income updated.".to_owned())),
        )
            .into_response(),
        Err(Error::UpdateMissingIncome) => Error::UpdateMissingIncome.into_alert_response(),
        Err(error) => {
            tracing::error!("could not update income {income_id} of user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_income_view(income_id: IncomeId, form: &IncomeForm, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOME_VIEW).into_html();
    let form = income_form_view(
        FormAction::Edit(income_id),
        form,
        &IncomeErrors::default(),
        today,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Edit Income" }
                (form)
            }
        }
    };

    base("Edit Income", &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod edit_income_tests {
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
        income::{
            Income, IncomeDetails, IncomeForm, IncomeType, create_income, edit::EditIncomeState,
            get_edit_income_page, get_income, update_income_endpoint,
        },
        money::Money,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_hx_redirect,
            assert_status_ok, assert_valid_html, get_selected_option, get_test_connection,
            insert_test_user, must_get_form, parse_html_document,
        },
    };

    fn setup() -> (EditIncomeState, UserID, Income) {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let income = create_income(
            user_id,
            &IncomeDetails {
                income_type: IncomeType::Rental,
                amount: Money::from_cents(80_000),
                date_received: date!(2025 - 02 - 01),
                description: Some("Flat".to_owned()),
            },
            &connection,
        )
        .unwrap();

        let state = EditIncomeState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, user_id, income)
    }

    #[tokio::test]
    async fn edit_page_is_prefilled() {
        let (state, user_id, income) = setup();

        let response = get_edit_income_page(State(state), Extension(user_id), Path(income.id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, &format_endpoint(endpoints::INCOME, income.id), "hx-put");
        assert_eq!(
            get_selected_option(&form, "income_type"),
            Some("RENTAL".to_owned())
        );
        assert_form_input_with_value(&form, "amount", "number", "800.00");
        assert_form_input_with_value(&form, "date_received", "date", "2025-02-01");
    }

    #[tokio::test]
    async fn edit_page_for_missing_income_is_not_found() {
        let (state, user_id, _) = setup();

        let error = get_edit_income_page(State(state), Extension(user_id), Path(999))
            .await
            .unwrap_err();

        assert_eq!(error, Error::NotFound);
    }

    #[tokio::test]
    async fn updates_income() {
        let (state, user_id, income) = setup();
        let form = IncomeForm {
            income_type: Some("BUSINESS".to_owned()),
            amount: Some("12.34".to_owned()),
            date_received: Some("2025-02-03".to_owned()),
            description: None,
        };

        let response = update_income_endpoint(
            State(state.clone()),
            Extension(user_id),
            Path(income.id),
            PrivateCookieJar::new(create_cookie_key("foobar")),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOME_VIEW);
        let got = get_income(user_id, income.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.income_type, IncomeType::Business);
        assert_eq!(got.amount, Money::from_cents(1_234));
        assert_eq!(got.description, None);
    }

    #[tokio::test]
    async fn cannot_update_another_users_income() {
        let (state, _, income) = setup();
        let intruder = insert_test_user("mallory", &state.db_connection.lock().unwrap());
        let form = IncomeForm {
            income_type: Some("BUSINESS".to_owned()),
            amount: Some("12.34".to_owned()),
            date_received: Some("2025-02-03".to_owned()),
            description: None,
        };

        let response = update_income_endpoint(
            State(state),
            Extension(intruder),
            Path(income.id),
            PrivateCookieJar::new(create_cookie_key("foobar")),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
