//! The monthly budget record document type.

use time::OffsetDateTime;

use crate::budget::{BudgetStatus, ExpenseBreakdown};

/// A persisted document summarizing one month's income, expenses, predicted
/// baseline, and derived balances.
///
/// Records are created exactly once per successful submission and are never
/// mutated or deleted by the application.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRecord {
    /// The ID of the record in the database.
    pub id: i64,
    /// The month label the record is for, e.g. "january 2024".
    pub month: String,
    /// The monthly income.
    pub income: i64,
    /// The six expense category amounts.
    pub expenses: ExpenseBreakdown,
    /// The sum of the six category amounts.
    pub real_expense: i64,
    /// The model- or heuristic-derived expected expense.
    pub predicted_baseline: i64,
    /// Income minus the actual expense.
    pub account_balance: i64,
    /// Income minus the predicted baseline.
    pub savings_balance: i64,
    /// How the month measured up against the predicted baseline.
    pub status: BudgetStatus,
    /// When the record was created.
    pub created_at: OffsetDateTime,
    /// When the record was last written. Equals `created_at` since records
    /// are immutable.
    pub updated_at: OffsetDateTime,
}

/// The data for a budget record that has not been persisted yet.
///
/// The ID and timestamps are assigned by
/// [insert_budget_record](crate::budget::insert_budget_record).
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudgetRecord {
    /// The month label the record is for.
    pub month: String,
    /// The monthly income.
    pub income: i64,
    /// The six expense category amounts.
    pub expenses: ExpenseBreakdown,
    /// The sum of the six category amounts.
    pub real_expense: i64,
    /// The model- or heuristic-derived expected expense.
    pub predicted_baseline: i64,
    /// Income minus the actual expense.
    pub account_balance: i64,
    /// Income minus the predicted baseline.
    pub savings_balance: i64,
    /// How the month measured up against the predicted baseline.
    pub status: BudgetStatus,
}
