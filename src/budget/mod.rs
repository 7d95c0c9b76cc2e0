//! Monthly budget records: the domain types, status derivation, and the
//! SQLite-backed record store.

mod core;
mod db;
mod models;

pub use core::{BudgetStatus, ExpenseBreakdown, default_month_label, normalize_month_label};
pub use db::{
    create_budget_table, delete_all_budget_records, get_budget_records, get_distinct_months,
    get_latest_budget_record, insert_budget_record,
};
pub use models::{BudgetRecord, NewBudgetRecord};
