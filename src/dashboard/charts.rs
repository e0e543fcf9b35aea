//! The ECharts bar chart of monthly income and expenses.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{MonthlyTotals, chart_series},
    html::HeadElement,
};

/// The HTML element ID of the chart container.
pub(super) const CHART_ID: &str = "monthly-chart";

/// The container the chart is drawn into.
pub(super) fn chart_view() -> Markup {
    html!(
        section id="charts" class="w-full max-w-5xl mb-6"
        {
            div id=(CHART_ID) class="min-h-[380px] rounded dark:bg-gray-100" {}
        }
    )
}

/// Script that draws `chart` once the page has loaded and follows the user's colour scheme.
pub(super) fn chart_script(chart: &Chart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chart = echarts.init(document.getElementById("{CHART_ID}"));
            chart.setOption({chart});

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

pub(super) fn monthly_chart(totals: &[MonthlyTotals]) -> Chart {
    let (labels, income, expenses) = chart_series(totals);

    Chart::new()
        .title(Title::new().text("Income vs Expenses").subtext("Per month"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().left("center").top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Income").data(income))
        .series(Bar::new().name("Expenses").data(expenses))
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod charts_tests {
    use time::macros::date;

    use crate::{
        dashboard::{
            aggregation::MonthlyTotals,
            charts::{chart_script, monthly_chart},
        },
        html::HeadElement,
        money::Money,
    };

    #[test]
    fn chart_has_income_and_expense_series_by_month() {
        let chart = monthly_chart(&[
            MonthlyTotals {
                month: date!(2025 - 01 - 01),
                income: Money::from_cents(100_000),
                expenses: Money::from_cents(25_050),
            },
            MonthlyTotals {
                month: date!(2025 - 02 - 01),
                income: Money::ZERO,
                expenses: Money::from_cents(1_000),
            },
        ]);

        let options = chart.to_string();

        assert!(options.contains("\"Jan 2025\""));
        assert!(options.contains("\"Feb 2025\""));
        assert!(options.contains("\"Income\""));
        assert!(options.contains("\"Expenses\""));
        assert!(options.contains("250.5"));
    }

    #[test]
    fn script_targets_chart_container() {
        let HeadElement::ScriptSource(script) = chart_script(&monthly_chart(&[])) else {
            panic!("expected inline script");
        };

        assert!(script.0.contains("document.getElementById(\"monthly-chart\")"));
    }
}
