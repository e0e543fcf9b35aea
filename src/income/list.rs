//! The income page: every income entry, totals for recent periods, and the form for recording income.

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
        stat_card,
    },
    income::{
        Income, IncomeErrors, IncomeForm, IncomeType,
        db::{get_income_totals_by_type, get_incomes, get_total_income},
        form::{FormAction, income_form_view},
    },
    money::Money,
    navigation::NavBar,
    period::Period,
    timezone::local_today,
};

/// The state needed for the income page.
#[derive(Debug, Clone)]
pub struct IncomePageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IncomePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

struct PeriodTotals {
    period: Period,
    by_type: Vec<(IncomeType, Money)>,
}

/// Render the income page for the logged in user.
pub async fn get_income_page(
    State(state): State<IncomePageState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let incomes = get_incomes(user_id, &connection)?;
    let total = get_total_income(user_id, &connection)?;
    let period_totals = Period::ALL
        .into_iter()
        .map(|period| {
            get_income_totals_by_type(user_id, period.start(today), &connection)
                .map(|by_type| PeriodTotals { period, by_type })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        income_view(&incomes, total, &period_totals, flash.as_ref(), today),
    )
        .into_response())
}

fn period_totals_view(period_totals: &[PeriodTotals]) -> Markup {
    html! {
        section class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 w-full max-w-5xl mb-6"
        {
            @for totals in period_totals {
                div class=(CARD_STYLE) data-period-months=(totals.period.months())
                {
                    h2 class="text-sm font-semibold mb-2" { (totals.period.label()) }

                    @if totals.by_type.is_empty() {
                        p class="text-sm text-gray-500 dark:text-gray-400" { "No income" }
                    }

                    ul class="text-sm space-y-1"
                    {
                        @for (income_type, amount) in &totals.by_type {
                            li class="flex justify-between gap-2"
                            {
                                span { (income_type) }
                                span class="tabular-nums" { (format_currency(*amount)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn income_row(income: &Income) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_INCOME_VIEW, income.id);
    let delete_url = format_endpoint(endpoints::INCOME, income.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(income.date_received) { (income.date_received) }
            }
            td class=(TABLE_CELL_STYLE) { (income.income_type) }
            td class="px-6 py-4 text-right tabular-nums" { (format_currency(income.amount)) }
            td class=(TABLE_CELL_STYLE) { (income.description.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE)
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    "Are you sure you want to delete this income? This cannot be undone.",
                    "closest tr",
                    "delete",
                ))
            }
        }
    }
}

fn income_view(
    incomes: &[Income],
    total: Money,
    period_totals: &[PeriodTotals],
    flash: Option<&Flash>,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOME_VIEW).into_html();
    let form = income_form_view(
        FormAction::Create,
        &IncomeForm::default(),
        &IncomeErrors::default(),
        today,
    );

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(flash) = flash {
                (flash.view())
            }

            (page_header("Income", Some(endpoints::INCOME_EXPORT)))

            section class="w-full max-w-5xl mb-6" { (stat_card("Total Income", total)) }

            (period_totals_view(period_totals))

            section class="w-full max-w-5xl overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class="px-6 py-4 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for income in incomes {
                            (income_row(income))
                        }

                        @if incomes.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="5" class="px-6 py-4 text-center" { "No income recorded yet." }
                            }
                        }
                    }
                }
            }

            section class={ "w-full max-w-md mt-8 " (CARD_STYLE) }
            {
                h2 class="text-lg font-semibold mb-4" { "Record Income" }
                (form)
            }
        }
    };

    base("Income", &[dollar_input_styles()], &content)
}
