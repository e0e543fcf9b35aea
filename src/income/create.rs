//! The endpoint for recording income.

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
    flash::{Flash, set_flash},
    form::ensure_not_future,
    income::{
        IncomeForm,
        db::create_income,
        form::{FormAction, income_form_view},
    },
    timezone::local_today,
};

/// The state needed to record income.
#[derive(Debug, Clone)]
pub struct CreateIncomeState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording income, redirects to the income page on success.
pub async fn create_income_endpoint(
    State(state): State<CreateIncomeState>,
    Extension(user_id): Extension<UserID>,
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
            return income_form_view(FormAction::Create, &form, &errors, today).into_response();
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

    match create_income(user_id, &details, &connection) {
        Ok(_) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::INCOME_VIEW.to_owned()),
            set_flash(jar, &Flash::Success("Income added.".to_owned())),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not record income for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
