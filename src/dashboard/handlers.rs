//! Dashboard route handler and page view.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    dashboard::{
        aggregation::{MonthlyTotals, get_monthly_totals},
        charts::{chart_script, chart_view, monthly_chart},
        tables::{recent_expenses_table, recent_incomes_table, upcoming_goals_list},
    },
    endpoints,
    expense::{Expense, get_recent_expenses},
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, stat_card},
    income::{Income, get_recent_incomes},
    navigation::NavBar,
    savings::{SavingsGoal, get_goals_by_target_date},
    transactions::{TransactionTotals, get_transaction_totals},
};

/// How many of the latest incomes and expenses to show.
const RECENT_LIMIT: u32 = 5;
/// How many goals, nearest target date first, to show.
const GOAL_LIMIT: u32 = 3;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the user's data.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    totals: TransactionTotals,
    recent_incomes: Vec<Income>,
    recent_expenses: Vec<Expense>,
    goals: Vec<SavingsGoal>,
    monthly_totals: Vec<MonthlyTotals>,
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let data = build_dashboard_data(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not load dashboard for {user_id}: {error}"))?;

    Ok(dashboard_view(&data).into_response())
}

fn build_dashboard_data(owner: UserID, connection: &Connection) -> Result<DashboardData, Error> {
    Ok(DashboardData {
        totals: get_transaction_totals(owner, connection)?,
        recent_incomes: get_recent_incomes(owner, RECENT_LIMIT, connection)?,
        recent_expenses: get_recent_expenses(owner, RECENT_LIMIT, connection)?,
        goals: get_goals_by_target_date(owner, GOAL_LIMIT, connection)?,
        monthly_totals: get_monthly_totals(owner, connection)?,
    })
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let has_chart = !data.monthly_totals.is_empty();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl mb-4" { h1 class="text-xl font-bold" { "Dashboard" } }

            section class="grid grid-cols-2 lg:grid-cols-4 gap-4 w-full max-w-5xl mb-6"
            {
                (stat_card("Total Income", data.totals.income))
                (stat_card("Total Expenses", data.totals.expenses))
                (stat_card("Total Saved", data.totals.savings))
                (stat_card("Net Balance", data.totals.net_balance))
            }

            @if has_chart {
                (chart_view())
            } @else {
                p class="w-full max-w-5xl mb-6 text-gray-500 dark:text-gray-400"
                {
                    "Record some income or expenses to see your monthly chart."
                }
            }

            div class="grid grid-cols-1 lg:grid-cols-3 gap-4 w-full max-w-5xl"
            {
                (recent_incomes_table(&data.recent_incomes))
                (recent_expenses_table(&data.recent_expenses))
                (upcoming_goals_list(&data.goals))
            }
        }
    );

    let scripts = if has_chart {
        vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            chart_script(&monthly_chart(&data.monthly_totals)),
        ]
    } else {
        Vec::new()
    };

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use scraper::Selector;
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        dashboard::{get_dashboard_page, handlers::DashboardState},
        expense::{ExpenseCategory, ExpenseDetails, PaymentSource, create_expense},
        income::{IncomeDetails, IncomeType, create_income},
        money::Money,
        savings::{GoalDetails, GoalName, create_goal},
        test_utils::{
            assert_status_ok, assert_valid_html, get_test_connection, insert_test_user,
            parse_html_document, select_text,
        },
    };

    #[tokio::test]
    async fn empty_dashboard_has_zero_totals_and_no_chart() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "p.text-2xl"),
            ["$0.00", "$0.00", "$0.00", "$0.00"]
        );
        assert!(
            html.select(&Selector::parse("#monthly-chart").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn shows_recent_activity_and_nearest_goals() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);

        for day in 1..=6 {
            create_income(
                user_id,
                &IncomeDetails {
                    income_type: IncomeType::Business,
                    amount: Money::from_cents(10_000),
                    date_received: date!(2025 - 01 - 01) + Duration::days(day),
                    description: None,
                },
                &connection,
            )
            .unwrap();
        }
        create_expense(
            user_id,
            &ExpenseDetails {
                category: ExpenseCategory::Utilities,
                amount: Money::from_cents(12_000),
                date_incurred: date!(2025 - 01 - 20),
                source: PaymentSource::BankAccount,
                description: Some("Power".to_owned()),
            },
            &connection,
        )
        .unwrap();
        for (name, months) in [("Far", 12), ("Near", 1), ("Mid", 6), ("Later", 9)] {
            create_goal(
                user_id,
                &GoalDetails {
                    name: GoalName::new_unchecked(name),
                    target_amount: Money::from_cents(100_000),
                    target_date: date!(2026 - 01 - 01) + Duration::days(30 * months),
                },
                Money::from_cents(5_000),
                OffsetDateTime::UNIX_EPOCH,
                &connection,
            )
            .unwrap();
        }
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "p.text-2xl"),
            ["$600.00", "$120.00", "$200.00", "$280.00"]
        );
        assert_eq!(select_text(&html, "#recent-incomes tbody tr").len(), 5);
        assert_eq!(
            select_text(&html, "#recent-incomes tbody tr")[0],
            "2025-01-07Business$100.00"
        );
        assert_eq!(
            select_text(&html, "#recent-expenses tbody tr"),
            ["2025-01-20Utilities$120.00"]
        );
        assert_eq!(
            select_text(&html, "#upcoming-goals li span.font-medium"),
            ["Near", "Mid", "Later"]
        );
        assert!(
            html.select(&Selector::parse("#monthly-chart").unwrap())
                .next()
                .is_some()
        );
    }
}
