//! Card and table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    budget::BudgetRecord,
    endpoints,
    view_templates::{
        BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_currency,
    },
};

use super::aggregation::BalanceTotals;

const CARD_STYLE: &str = "flex-1 p-6 bg-white rounded-lg shadow dark:bg-gray-800";
const CARD_LABEL_STYLE: &str = "text-sm text-gray-500 dark:text-gray-400";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for non-negative, red for negative).
fn amount_color_class(amount: i64) -> &'static str {
    if amount >= 0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders the cards summarizing balance totals and the latest submission.
pub(super) fn summary_cards(totals: &BalanceTotals, latest: &Option<BudgetRecord>) -> Markup {
    html! {
        div class="flex flex-col lg:flex-row gap-4 w-full max-w-4xl"
        {
            div class=(CARD_STYLE)
            {
                p class=(CARD_LABEL_STYLE) { "Total Account Balance" }
                p id="total-account-balance" class={"text-2xl font-bold " (amount_color_class(totals.account))}
                {
                    (format_currency(totals.account))
                }
            }

            div class=(CARD_STYLE)
            {
                p class=(CARD_LABEL_STYLE) { "Total Savings Balance" }
                p id="total-savings-balance" class={"text-2xl font-bold " (amount_color_class(totals.savings))}
                {
                    (format_currency(totals.savings))
                }
            }

            @if let Some(latest) = latest
            {
                div class=(CARD_STYLE)
                {
                    p class=(CARD_LABEL_STYLE) { "Latest Month" }
                    p id="latest-month" class="text-2xl font-bold" { (latest.month) }
                    p id="latest-status" { (latest.status) }
                }
            }
        }
    }
}

/// Renders the month filter as a drop-down populated with the distinct
/// month labels across all records.
pub(super) fn month_filter_form(months: &[String], selected: Option<&str>) -> Markup {
    html! {
        form method="get" action=(endpoints::DASHBOARD_VIEW) class="flex flex-row gap-2 items-center mt-6"
        {
            select name="month" id="month-filter" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "All months" }

                @for month in months
                {
                    option value=(month) selected[selected == Some(month.as_str())] { (month) }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    }
}

/// Renders the budget records as a table, oldest first.
pub(super) fn records_table(records: &[BudgetRecord]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow mt-6 w-full max-w-4xl"
        {
            table id="budget-records" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Income" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actual Expense" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Predicted Baseline" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Account Balance" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Savings Balance" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    }
                }
                tbody
                {
                    @for record in records
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { (record.month) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(record.income)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(record.real_expense)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(record.predicted_baseline)) }
                            td class={(TABLE_CELL_STYLE) " " (amount_color_class(record.account_balance))}
                            {
                                (format_currency(record.account_balance))
                            }
                            td class={(TABLE_CELL_STYLE) " " (amount_color_class(record.savings_balance))}
                            {
                                (format_currency(record.savings_balance))
                            }
                            td class=(TABLE_CELL_STYLE) { (record.status) }
                        }
                    }
                }
            }
        }
    }
}
