//! The recent activity tables and the upcoming goals list on the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints,
    expense::Expense,
    html::{CARD_STYLE, TABLE_ROW_STYLE, format_currency, link, progress_bar},
    income::Income,
    savings::SavingsGoal,
};

const HEADER_STYLE: &str =
    "text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400";
const CELL_STYLE: &str = "px-3 py-3";
const AMOUNT_CELL_STYLE: &str = "px-3 py-3 text-right tabular-nums";

fn card_heading(title: &str, view_all_url: &str) -> Markup {
    html! {
        div class="flex justify-between items-baseline mb-4"
        {
            h2 class="text-lg font-semibold" { (title) }
            (link(view_all_url, "View all"))
        }
    }
}

/// The most recent incomes.
pub(super) fn recent_incomes_table(incomes: &[Income]) -> Markup {
    html! {
        section id="recent-incomes" class=(CARD_STYLE)
        {
            (card_heading("Recent Income", endpoints::INCOME_VIEW))

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(CELL_STYLE) { "Date" }
                        th scope="col" class=(CELL_STYLE) { "Type" }
                        th scope="col" class=(AMOUNT_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for income in incomes {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(CELL_STYLE) { (income.date_received) }
                            td class=(CELL_STYLE) { (income.income_type) }
                            td class=(AMOUNT_CELL_STYLE) { (format_currency(income.amount)) }
                        }
                    }

                    @if incomes.is_empty() {
                        tr { td colspan="3" class="px-3 py-3 text-center" { "No income yet." } }
                    }
                }
            }
        }
    }
}

/// The most recent expenses.
pub(super) fn recent_expenses_table(expenses: &[Expense]) -> Markup {
    html! {
        section id="recent-expenses" class=(CARD_STYLE)
        {
            (card_heading("Recent Expenses", endpoints::EXPENSES_VIEW))

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(CELL_STYLE) { "Date" }
                        th scope="col" class=(CELL_STYLE) { "Category" }
                        th scope="col" class=(AMOUNT_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(CELL_STYLE) { (expense.date_incurred) }
                            td class=(CELL_STYLE) { (expense.category) }
                            td class=(AMOUNT_CELL_STYLE) { (format_currency(expense.amount)) }
                        }
                    }

                    @if expenses.is_empty() {
                        tr { td colspan="3" class="px-3 py-3 text-center" { "No expenses yet." } }
                    }
                }
            }
        }
    }
}

/// The goals with the nearest target dates and how far along each one is.
pub(super) fn upcoming_goals_list(goals: &[SavingsGoal]) -> Markup {
    html! {
        section id="upcoming-goals" class=(CARD_STYLE)
        {
            (card_heading("Savings Goals", endpoints::SAVINGS_VIEW))

            @if goals.is_empty() {
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "No savings goals yet."
                }
            }

            ul class="space-y-4"
            {
                @for goal in goals {
                    li data-goal-id=(goal.id)
                    {
                        div class="flex justify-between text-sm mb-1"
                        {
                            span class="font-medium text-gray-900 dark:text-white" { (goal.name) }
                            span class="tabular-nums"
                            {
                                (format_currency(goal.current_amount))
                                " / "
                                (format_currency(goal.target_amount))
                            }
                        }

                        (progress_bar(goal.progress_percentage()))

                        p class="text-xs text-gray-500 dark:text-gray-400 mt-1"
                        {
                            "Due " (goal.target_date)
                        }
                    }
                }
            }
        }
    }
}
