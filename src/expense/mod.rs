//! Recording what a user spends, by category and payment source.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod export;
mod form;
mod list;

pub use create::create_expense_endpoint;
pub use db::{
    create_expense, create_expense_table, delete_expense, get_expense,
    get_expense_totals_by_category, get_expenses, get_recent_expenses, get_total_expenses,
    update_expense,
};
pub use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseCategory, ExpenseDetails, ExpenseId, PaymentSource};
pub use edit::{get_edit_expense_page, update_expense_endpoint};
pub use export::export_expenses;
pub use form::{ExpenseErrors, ExpenseForm};
pub use list::get_expense_page;
