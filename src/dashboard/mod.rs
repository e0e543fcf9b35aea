//! The dashboard: an overview of the user's totals, recent activity and nearest goals,
//! with a chart of income and expenses per month.

mod aggregation;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
