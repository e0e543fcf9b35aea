//! The endpoint for contributing to a new or existing savings goal.

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
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    flash::{Flash, set_flash},
    savings::{
        ContributionForm, Outcome, contribute,
        db::get_goals,
        form::{FormAction, contribution_form_view},
    },
    timezone::local_today,
};

/// The state needed to contribute to a savings goal.
#[derive(Debug, Clone)]
pub struct ContributeState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ContributeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Redirect to the savings page, which then shows how the contribution was applied.
pub(super) fn redirect_with_outcome(jar: PrivateCookieJar, outcome: Outcome) -> Response {
    let flash = if outcome.was_capped() {
        Flash::Info(outcome.to_string())
    } else {
        Flash::Success(outcome.to_string())
    };

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::SAVINGS_VIEW.to_owned()),
        set_flash(jar, &flash),
    )
        .into_response()
}

/// A route handler for creating a savings goal or adding to an existing one.
///
/// Invalid fields are reported by responding with the form and its error
/// messages. On success the client is redirected to the savings page.
pub async fn contribute_endpoint(
    State(state): State<ContributeState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<ContributionForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let request = match form.parse(None, today) {
        Ok(request) => request,
        Err(errors) => {
            return match get_goals(user_id, &connection) {
                Ok(goals) => {
                    contribution_form_view(FormAction::Contribute, &form, &errors, &goals, today)
                        .into_response()
                }
                Err(error) => error.into_alert_response(),
            };
        }
    };

    match contribute(request, user_id, OffsetDateTime::now_utc(), today, &connection) {
        Ok(contribution) => redirect_with_outcome(jar, contribution.outcome),
        Err(Error::MissingGoal) => {
            tracing::warn!("user {user_id} tried to contribute to a missing goal");
            Error::MissingGoal.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not save contribution for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
