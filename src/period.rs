//! Rolling reporting periods for the income and expense summaries.
//!
//! A month is counted as 30 days, so "the last 3 months" starts 90 days before today.

use time::{Date, Duration};

/// A window of time ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    TwelveMonths,
}

impl Period {
    /// Every period, shortest first.
    pub const ALL: [Period; 4] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::TwelveMonths,
    ];

    /// The length of the period in 30-day months.
    pub fn months(self) -> i64 {
        match self {
            Period::OneMonth => 1,
            Period::ThreeMonths => 3,
            Period::SixMonths => 6,
            Period::TwelveMonths => 12,
        }
    }

    /// A short heading for the period, e.g. "Last 3 Months".
    pub fn label(self) -> &'static str {
        match self {
            Period::OneMonth => "Last Month",
            Period::ThreeMonths => "Last 3 Months",
            Period::SixMonths => "Last 6 Months",
            Period::TwelveMonths => "Last 12 Months",
        }
    }

    /// The first date included in the period ending on `today`.
    pub fn start(self, today: Date) -> Date {
        today.saturating_sub(Duration::days(30 * self.months()))
    }
}

#[cfg(test)]
mod period_tests {
    use time::macros::date;

    use crate::period::Period;

    #[test]
    fn months_are_thirty_days() {
        let today = date!(2025 - 06 - 30);

        assert_eq!(Period::OneMonth.start(today), date!(2025 - 05 - 31));
        assert_eq!(Period::ThreeMonths.start(today), date!(2025 - 04 - 01));
        assert_eq!(Period::TwelveMonths.start(today), date!(2024 - 07 - 05));
    }

    #[test]
    fn periods_are_ordered_shortest_first() {
        let months: Vec<i64> = Period::ALL.iter().map(|period| period.months()).collect();

        assert_eq!(months, [1, 3, 6, 12]);
    }
}
