//! Recording the income a user receives.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod export;
mod form;
mod list;

pub use create::create_income_endpoint;
pub use db::{
    create_income, create_income_table, delete_income, get_income, get_income_totals_by_type,
    get_incomes, get_recent_incomes, get_total_income, update_income,
};
pub use delete::delete_income_endpoint;
pub use domain::{Income, IncomeDetails, IncomeId, IncomeType};
pub use edit::{get_edit_income_page, update_income_endpoint};
pub use export::export_income;
pub use form::{IncomeErrors, IncomeForm};
pub use list::get_income_page;
