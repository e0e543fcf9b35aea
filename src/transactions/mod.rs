//! A single history of everything a user has earned, spent and saved.

mod export;
mod history;
mod page;

pub use export::export_transactions;
pub use history::{
    Transaction, TransactionKind, TransactionTotals, get_transaction_history,
    get_transaction_totals,
};
pub use page::get_transactions_page;
