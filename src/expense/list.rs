//! The expenses page: every expense, spending per category and the expense form.

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
    expense::{
        Expense, ExpenseCategory, ExpenseErrors, ExpenseForm,
        db::{get_expense_totals_by_category, get_expenses, get_total_expenses},
        form::{FormAction, expense_form_view},
    },
    money::Money,
    navigation::NavBar,
    period::Period,
    timezone::local_today,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensePageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

struct PeriodTotals {
    period: Period,
    by_category: Vec<(ExpenseCategory, Money)>,
}

/// Render the expenses page for the logged in user.
pub async fn get_expense_page(
    State(state): State<ExpensePageState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_expenses(user_id, &connection)?;
    let total = get_total_expenses(user_id, &connection)?;
    let period_totals = Period::ALL
        .into_iter()
        .map(|period| {
            get_expense_totals_by_category(user_id, period.start(today), &connection)
                .map(|by_category| PeriodTotals { period, by_category })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        expenses_view(&expenses, total, &period_totals, flash.as_ref(), today),
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

                    @if totals.by_category.is_empty() {
                        p class="text-sm text-gray-500 dark:text-gray-400" { "No expenses" }
                    }

                    ul class="text-sm space-y-1"
                    {
                        @for (category, amount) in &totals.by_category {
                            li class="flex justify-between gap-2"
                            {
                                span { (category) }
                                span class="tabular-nums" { (format_currency(*amount)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_row(expense: &Expense) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
    let delete_url = format_endpoint(endpoints::EXPENSE, expense.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(expense.date_incurred) { (expense.date_incurred) }
            }
            td class=(TABLE_CELL_STYLE) { (expense.category) }
            td class="px-6 py-4 text-right tabular-nums" { (format_currency(expense.amount)) }
            td class=(TABLE_CELL_STYLE) { (expense.source) }
            td class=(TABLE_CELL_STYLE) { (expense.description.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE)
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    "Are you sure you want to delete this expense? This cannot be undone.",
                    "closest tr",
                    "delete",
                ))
            }
        }
    }
}

fn expenses_view(
    expenses: &[Expense],
    total: Money,
    period_totals: &[PeriodTotals],
    flash: Option<&Flash>,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let form = expense_form_view(
        FormAction::Create,
        &ExpenseForm::default(),
        &ExpenseErrors::default(),
        today,
    );

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            @if let Some(flash) = flash {
                (flash.view())
            }

            (page_header("Expenses", Some(endpoints::EXPENSES_EXPORT)))

            section class="w-full max-w-5xl mb-6" { (stat_card("Total Expenses", total)) }

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
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-4 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Paid With" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for expense in expenses {
                            (expense_row(expense))
                        }

                        @if expenses.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="6" class="px-6 py-4 text-center"
                                {
                                    "No expenses recorded yet."
                                }
                            }
                        }
                    }
                }
            }

            section class={ "w-full max-w-md mt-8 " (CARD_STYLE) }
            {
                h2 class="text-lg font-semibold mb-4" { "Record Expense" }
                (form)
            }
        }
    };

    base("Expenses", &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod expense_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use axum_extra::extract::PrivateCookieJar;
    use time::Duration;

    use crate::{
        app_state::create_cookie_key,
        endpoints,
        expense::{
            ExpenseCategory, ExpenseDetails, PaymentSource, create_expense, get_expense_page,
            list::ExpensePageState,
        },
        money::Money,
        test_utils::{
            assert_form_select, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            get_selected_option, get_test_connection, insert_test_user, must_get_form,
            parse_html_document, select_text,
        },
        timezone::local_today,
    };

    #[tokio::test]
    async fn lists_expenses_with_category_totals() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let today = local_today("Etc/UTC").unwrap();
        for (category, cents, days_ago) in [
            (ExpenseCategory::Housing, 45_000, 2),
            (ExpenseCategory::Food, 6_000, 10),
            (ExpenseCategory::Housing, 45_000, 33),
            (ExpenseCategory::Education, 120_000, 300),
        ] {
            create_expense(
                user_id,
                &ExpenseDetails {
                    category,
                    amount: Money::from_cents(cents),
                    date_incurred: today - Duration::days(days_ago),
                    source: PaymentSource::BankAccount,
                    description: None,
                },
                &connection,
            )
            .unwrap();
        }
        let state = ExpensePageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let jar = PrivateCookieJar::new(create_cookie_key("foobar"));

        let response = get_expense_page(State(state), Extension(user_id), jar)
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_text(&html, "tbody tr").len(), 4);
        assert_eq!(select_text(&html, "p.text-2xl"), ["$2,160.00"]);
        assert_eq!(
            select_text(&html, "[data-period-months='1'] li"),
            ["Housing$450.00", "Food$60.00"]
        );
        assert_eq!(
            select_text(&html, "[data-period-months='3'] li"),
            ["Housing$900.00", "Food$60.00"]
        );
        assert_eq!(
            select_text(&html, "[data-period-months='12'] li"),
            ["Education$1,200.00", "Housing$900.00", "Food$60.00"]
        );
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::EXPENSES_API, "hx-post");
        assert_eq!(get_selected_option(&form, "category"), Some("OTHER".to_owned()));
        assert_form_select(
            &form,
            "source",
            &["CASH", "BANK_ACCOUNT", "CREDIT_CARD", "DIGITAL_WALLET", "OTHER"],
        );
    }
}
