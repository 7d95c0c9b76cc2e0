//! Budget record aggregation for the dashboard summary.

use crate::budget::BudgetRecord;

/// Running totals of the account and savings balances across a set of
/// records.
#[derive(Debug, PartialEq, Eq, Default)]
pub(super) struct BalanceTotals {
    pub(super) account: i64,
    pub(super) savings: i64,
}

/// Sum the account and savings balances over `records`.
pub(super) fn calculate_balance_totals(records: &[BudgetRecord]) -> BalanceTotals {
    records.iter().fold(BalanceTotals::default(), |totals, record| {
        BalanceTotals {
            account: totals.account + record.account_balance,
            savings: totals.savings + record.savings_balance,
        }
    })
}
