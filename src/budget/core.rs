//! Core domain types and calculations for monthly budget records.

use std::fmt::Display;

use time::{Month, OffsetDateTime};

/// How a month's finances measured up against the predicted baseline.
///
/// When derived locally, the status is a pure function of the sign of the
/// savings balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// The savings balance is positive.
    Good,
    /// The savings balance is exactly zero.
    Balanced,
    /// The savings balance is negative.
    OverBudget,
}

impl BudgetStatus {
    /// Derive the status from the sign of `savings_balance`.
    pub fn from_savings_balance(savings_balance: i64) -> Self {
        match savings_balance {
            balance if balance > 0 => Self::Good,
            0 => Self::Balanced,
            _ => Self::OverBudget,
        }
    }

    /// Parse a status label as reported by the remote prediction service.
    ///
    /// Returns `None` for labels that are not one of the three known
    /// statuses, in which case the caller should derive the status itself.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Good" => Some(Self::Good),
            "Balanced" => Some(Self::Balanced),
            "Over Budget" => Some(Self::OverBudget),
            _ => None,
        }
    }

    /// The status label as stored and displayed, e.g. `"Over Budget"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Balanced => "Balanced",
            Self::OverBudget => "Over Budget",
        }
    }
}

impl Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The six expense category amounts submitted for a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpenseBreakdown {
    /// Monthly rent or mortgage payment.
    pub house_rent: i64,
    /// Groceries and eating out.
    pub food_costs: i64,
    /// Electricity bill.
    pub electricity: i64,
    /// Gas bill.
    pub gas: i64,
    /// Water bill.
    pub water: i64,
    /// Everything that does not fit the other categories.
    pub misc: i64,
}

impl ExpenseBreakdown {
    /// The sum of the six category amounts.
    pub fn total(&self) -> i64 {
        self.house_rent + self.food_costs + self.electricity + self.gas + self.water + self.misc
    }
}

/// Normalize a user-supplied month label: trimmed and lower-cased.
///
/// Returns `None` when the label is empty or whitespace, meaning the caller
/// should fall back to [default_month_label].
pub fn normalize_month_label(raw: &str) -> Option<String> {
    let label = raw.trim().to_lowercase();

    if label.is_empty() { None } else { Some(label) }
}

/// The label for the current calendar month, e.g. "January 2024".
pub fn default_month_label() -> String {
    let today = OffsetDateTime::now_utc().date();

    format!("{} {}", month_name(today.month()), today.year())
}

fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "January",
        Month::February => "February",
        Month::March => "March",
        Month::April => "April",
        Month::May => "May",
        Month::June => "June",
        Month::July => "July",
        Month::August => "August",
        Month::September => "September",
        Month::October => "October",
        Month::November => "November",
        Month::December => "December",
    }
}


#[cfg(test)]
mod expense_breakdown_tests {
    use super::ExpenseBreakdown;

    #[test]
    fn total_is_exact_sum_of_categories() {
        let breakdown = ExpenseBreakdown {
            house_rent: 1000,
            food_costs: 500,
            electricity: 100,
            gas: 50,
            water: 30,
            misc: 20,
        };

        assert_eq!(breakdown.total(), 1700);
    }

    #[test]
    fn total_of_defaults_is_zero() {
        assert_eq!(ExpenseBreakdown::default().total(), 0);
    }

    #[test]
    fn total_handles_negative_amounts() {
        let breakdown = ExpenseBreakdown {
            house_rent: -100,
            food_costs: 50,
            ..Default::default()
        };

        assert_eq!(breakdown.total(), -50);
    }
}
