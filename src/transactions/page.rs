//! The transactions page: the merged history and its totals.

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
    endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, page_header, stat_card,
    },
    navigation::NavBar,
    timezone::get_local_offset,
    transactions::history::{
        Transaction, TransactionTotals, get_transaction_history, get_transaction_totals,
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transaction history of the logged in user.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let history = get_transaction_history(user_id, local_offset, &connection)?;
    let totals = get_transaction_totals(user_id, &connection)?;

    Ok(transactions_view(&history, &totals).into_response())
}

fn amount_style(transaction: &Transaction) -> &'static str {
    if transaction.amount.is_positive() {
        "px-6 py-4 text-right tabular-nums text-green-600 dark:text-green-400"
    } else {
        "px-6 py-4 text-right tabular-nums text-red-600 dark:text-red-400"
    }
}

fn transactions_view(history: &[Transaction], totals: &TransactionTotals) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (page_header("Transactions", Some(endpoints::TRANSACTIONS_EXPORT)))

            section class="grid grid-cols-2 lg:grid-cols-4 gap-4 w-full max-w-5xl mb-6"
            {
                (stat_card("Total Income", totals.income))
                (stat_card("Total Expenses", totals.expenses))
                (stat_card("Total Saved", totals.savings))
                (stat_card("Net Balance", totals.net_balance))
            }

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
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for transaction in history {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    time datetime=(transaction.date) { (transaction.date) }
                                }
                                td class=(TABLE_CELL_STYLE) { (transaction.kind) }
                                td class=(TABLE_CELL_STYLE) { (transaction.description) }
                                td class=(TABLE_CELL_STYLE) { (transaction.category) }
                                td class=(amount_style(transaction))
                                {
                                    (format_currency(transaction.amount))
                                }
                            }
                        }

                        @if history.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="5" class="px-6 py-4 text-center"
                                {
                                    "Nothing here yet. Record some income to get started."
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &[], &content)
}
