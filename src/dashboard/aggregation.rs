//! Monthly income and expense totals for the dashboard chart.

use rusqlite::Connection;
use time::{Date, Month};

use crate::{Error, auth::UserID, money::Money};

/// The income and expenses of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct MonthlyTotals {
    /// The first day of the month.
    pub month: Date,
    pub income: Money,
    pub expenses: Money,
}

/// Sum the income and expenses of `owner` per calendar month, oldest month first.
///
/// Only months with at least one income or expense are included.
pub(super) fn get_monthly_totals(
    owner: UserID,
    connection: &Connection,
) -> Result<Vec<MonthlyTotals>, Error> {
    connection
        .prepare(
            "SELECT month, SUM(income), SUM(expenses) FROM (
                SELECT date(date_received, 'start of month') AS month, amount AS income, 0 AS expenses
                FROM income WHERE user_id = ?1
                UNION ALL
                SELECT date(date_incurred, 'start of month'), 0, amount
                FROM expense WHERE user_id = ?1
            )
            GROUP BY month
            ORDER BY month",
        )?
        .query_map([owner], |row| {
            Ok(MonthlyTotals {
                month: row.get(0)?,
                income: row.get(1)?,
                expenses: row.get(2)?,
            })
        })?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Formats a month as its abbreviated name and year, e.g. "Jan 2025".
pub(super) fn month_label(date: Date) -> String {
    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{month} {}", date.year())
}

/// Split monthly totals into chart labels, income values and expense values.
pub(super) fn chart_series(totals: &[MonthlyTotals]) -> (Vec<String>, Vec<f64>, Vec<f64>) {
    let labels = totals.iter().map(|total| month_label(total.month)).collect();
    let income = totals.iter().map(|total| total.income.as_f64()).collect();
    let expenses = totals.iter().map(|total| total.expenses.as_f64()).collect();

    (labels, income, expenses)
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::{
        dashboard::aggregation::{MonthlyTotals, chart_series, get_monthly_totals, month_label},
        expense::{ExpenseCategory, ExpenseDetails, PaymentSource, create_expense},
        income::{IncomeDetails, IncomeType, create_income},
        money::Money,
        test_utils::{get_test_connection, insert_test_user},
    };

    #[test]
    fn month_label_has_abbreviation_and_year() {
        assert_eq!(month_label(date!(2025 - 01 - 01)), "Jan 2025");
        assert_eq!(month_label(date!(2024 - 12 - 31)), "Dec 2024");
    }

    #[test]
    fn sums_income_and_expenses_per_month() {
        let connection = get_test_connection();
        let user_id = insert_test_user("alice", &connection);
        let other_user = insert_test_user("bob", &connection);

        for (owner, cents, date_received) in [
            (user_id, 100_000, date!(2025 - 01 - 05)),
            (user_id, 50_000, date!(2025 - 01 - 28)),
            (user_id, 100_000, date!(2025 - 03 - 05)),
            (other_user, 999_999, date!(2025 - 02 - 01)),
        ] {
            create_income(
                owner,
                &IncomeDetails {
                    income_type: IncomeType::Salary,
                    amount: Money::from_cents(cents),
                    date_received,
                    description: None,
                },
                &connection,
            )
            .unwrap();
        }

        for (cents, date_incurred) in [
            (20_000, date!(2025 - 01 - 10)),
            (5_000, date!(2025 - 02 - 14)),
        ] {
            create_expense(
                user_id,
                &ExpenseDetails {
                    category: ExpenseCategory::Food,
                    amount: Money::from_cents(cents),
                    date_incurred,
                    source: PaymentSource::Cash,
                    description: None,
                },
                &connection,
            )
            .unwrap();
        }

        let totals = get_monthly_totals(user_id, &connection).unwrap();

        assert_eq!(
            totals,
            [
                MonthlyTotals {
                    month: date!(2025 - 01 - 01),
                    income: Money::from_cents(150_000),
                    expenses: Money::from_cents(20_000),
                },
                MonthlyTotals {
                    month: date!(2025 - 02 - 01),
                    income: Money::ZERO,
                    expenses: Money::from_cents(5_000),
                },
                MonthlyTotals {
                    month: date!(2025 - 03 - 01),
                    income: Money::from_cents(100_000),
                    expenses: Money::ZERO,
                },
            ]
        );
    }

    #[test]
    fn chart_series_lines_up_with_labels() {
        let totals = [MonthlyTotals {
            month: date!(2025 - 06 - 01),
            income: Money::from_cents(12_345),
            expenses: Money::from_cents(500),
        }];

        let (labels, income, expenses) = chart_series(&totals);

        assert_eq!(labels, ["Jun 2025"]);
        assert_eq!(income, [123.45]);
        assert_eq!(expenses, [5.0]);
    }
}
