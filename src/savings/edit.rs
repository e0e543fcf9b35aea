//! Savings goal editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    error::capitalise_first_char,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles, link},
    navigation::NavBar,
    savings::{
        ContributionErrors, ContributionForm, GoalId, contribute,
        create::redirect_with_outcome,
        db::get_goal,
        form::{FormAction, contribution_form_view},
    },
    timezone::local_today,
};

/// The state needed for the edit goal page and endpoint.
#[derive(Debug, Clone)]
pub struct EditGoalState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing one of the user's savings goals.
pub async fn get_edit_goal_page(
    State(state): State<EditGoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = get_goal(user_id, goal_id, &connection)?;
    let form = ContributionForm::from_goal(&goal);

    Ok(edit_goal_view(goal_id, &form, &ContributionErrors::default(), today).into_response())
}

/// Handle the edit goal form.
///
/// The saved amount is replaced by the submitted amount, capped at the new target.
pub async fn update_goal_endpoint(
    State(state): State<EditGoalState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
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

    let action = FormAction::Edit(goal_id);

    let request = match form.parse(Some(goal_id), today) {
        Ok(request) => request,
        Err(errors) => {
            return contribution_form_view(action, &form, &errors, &[], today).into_response();
        }
    };

    match contribute(request, user_id, OffsetDateTime::now_utc(), today, &connection) {
        Ok(contribution) => redirect_with_outcome(jar, contribution.outcome),
        Err(error @ Error::DuplicateGoalName) => {
            let errors = ContributionErrors {
                name: Some(capitalise_first_char(&error.to_string())),
                ..Default::default()
            };

            contribution_form_view(action, &form, &errors, &[], today).into_response()
        }
        Err(Error::MissingGoal) => Error::MissingGoal.into_alert_response(),
        Err(error) => {
            tracing::error!("could not update savings goal {goal_id} of user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_goal_view(
    goal_id: GoalId,
    form: &ContributionForm,
    errors: &ContributionErrors,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SAVINGS_VIEW).into_html();
    let form = contribution_form_view(FormAction::Edit(goal_id), form, errors, &[], today);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Edit Savings Goal" }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "The amount saved replaces the goal's current savings. "
                    (link(endpoints::SAVINGS_VIEW, "Back to savings"))
                }

                (form)
            }
        }
    };

    base("Edit Savings Goal", &[dollar_input_styles()], &content)
}
