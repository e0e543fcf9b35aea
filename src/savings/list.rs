//! The savings page: totals, every goal with its progress, and the contribution form.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    flash::{Flash, take_flash},
    html::{
        CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, dollar_input_styles, edit_delete_action_links, format_currency, page_header,
        progress_bar, stat_card,
    },
    navigation::NavBar,
    savings::{
        ContributionErrors, ContributionForm, GoalStatus, SavingsGoal, SavingsTotals,
        db::{get_goals, get_savings_totals},
        form::{FormAction, contribution_form_view},
    },
    timezone::local_today,
};

/// The state needed for the savings page.
#[derive(Debug, Clone)]
pub struct SavingsPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the savings page for the logged in user.
///
/// A pending flash message, e.g. the outcome of the last contribution, is
/// shown once and then cleared.
pub async fn get_savings_page(
    State(state): State<SavingsPageState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goals = get_goals(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get savings goals for {user_id}: {error}"))?;
    let totals = get_savings_totals(user_id, &connection)?;

    let (jar, flash) = take_flash(jar);

    Ok((jar, savings_view(&goals, &totals, flash.as_ref(), today)).into_response())
}

/// Describe how long is left until `days` from now.
fn days_remaining_label(days: i64) -> String {
    match days {
        0 => "Due today".to_owned(),
        1 => "1 day".to_owned(),
        -1 => "1 day overdue".to_owned(),
        days if days < 0 => format!("{} days overdue", -days),
        days => format!("{days} days"),
    }
}

fn status_badge(status: GoalStatus) -> Markup {
    let style = match status {
        GoalStatus::Active => "bg-blue-100 text-blue-800 dark:bg-blue-900 dark:text-blue-300",
        GoalStatus::Complete => "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300",
    };

    html! {
        span class={ "text-xs font-medium px-2.5 py-0.5 rounded " (style) } { (status) }
    }
}

fn goal_row(goal: &SavingsGoal, today: Date) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_SAVINGS_GOAL_VIEW, goal.id);
    let delete_url = format_endpoint(endpoints::SAVINGS_GOAL, goal.id);
    let confirm_message = format!(
        "Are you sure you want to delete the goal '{}'? This cannot be undone.",
        goal.name
    );
    let progress = goal.progress_percentage();

    html! {
        tr class=(TABLE_ROW_STYLE) data-goal-id=(goal.id)
        {
            th
                scope="row"
                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
            {
                (goal.name)
            }

            td class="px-6 py-4 text-right tabular-nums"
            {
                (format_currency(goal.current_amount)) " / " (format_currency(goal.target_amount))
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex items-center gap-2 min-w-32"
                {
                    (progress_bar(progress))
                    span class="text-xs tabular-nums" { (progress) "%" }
                }
            }

            td class=(TABLE_CELL_STYLE) { (status_badge(goal.status())) }

            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(goal.target_date) { (goal.target_date) }
            }

            td class=(TABLE_CELL_STYLE) { (days_remaining_label(goal.days_remaining(today))) }

            td class=(TABLE_CELL_STYLE)
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &confirm_message,
                    "closest tr",
                    "delete",
                ))
            }
        }
    }
}

fn goals_table(goals: &[SavingsGoal], today: Date) -> Markup {
    html! {
        section class="w-full max-w-5xl overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Goal" }
                        th scope="col" class="px-6 py-4 text-right" { "Saved / Target" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Progress" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Target Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Remaining" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for goal in goals {
                        (goal_row(goal, today))
                    }

                    @if goals.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="7" class="px-6 py-4 text-center"
                            {
                                "No savings goals yet. Use the form below to start one."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn savings_view(
    goals: &[SavingsGoal],
    totals: &SavingsTotals,
    flash: Option<&Flash>,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SAVINGS_VIEW).into_html();
    let form = contribution_form_view(
        FormAction::Contribute,
        &ContributionForm::default(),
        &ContributionErrors::default(),
        goals,
        today,
    );

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(flash) = flash {
                (flash.view())
            }

            (page_header("Savings Goals", Some(endpoints::SAVINGS_EXPORT)))

            section class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full max-w-5xl mb-6"
            {
                (stat_card("Total Target", totals.total_target))
                (stat_card("Total Saved", totals.total_saved))
                (stat_card("Remaining", totals.remaining))
            }

            (goals_table(goals, today))

            section class={ "w-full max-w-md mt-8 " (CARD_STYLE) }
            {
                h2 class="text-lg font-semibold mb-4" { "Save Towards a Goal" }
                (form)
            }
        }
    };

    base("Savings", &[dollar_input_styles()], &content)
}
