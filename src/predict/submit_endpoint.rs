//! Defines the endpoint that runs the prediction flow for a submitted month.
//!
//! This is the write path of the application: parse the form figures, ask
//! the prediction gateway for a baseline, persist the resulting budget
//! record, and render the result page. The record is written only after the
//! prediction has fully resolved, so a failed request never leaves a
//! partial record behind.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    AppState, Error, endpoints,
    budget::{
        BudgetRecord, ExpenseBreakdown, NewBudgetRecord, default_month_label,
        insert_budget_record, normalize_month_label,
    },
    navigation::NavBar,
    predict::PredictionGateway,
    view_templates::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
};

/// The state needed to run the prediction flow.
#[derive(Debug, Clone)]
pub struct SubmitPredictionState {
    /// The database connection for storing budget records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client for the external prediction services.
    pub gateway: PredictionGateway,
}

impl FromRef<AppState> for SubmitPredictionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            gateway: state.gateway.clone(),
        }
    }
}

/// The raw form data for a monthly budget submission.
///
/// Every field is optional and arrives as text; numeric fields that are
/// missing or fail to parse are coerced to zero.
#[derive(Debug, Default, Deserialize)]
pub struct PredictForm {
    /// The month label, e.g. "january 2024".
    pub month: Option<String>,
    /// The monthly income.
    pub income: Option<String>,
    /// Monthly rent or mortgage payment.
    pub house_rent: Option<String>,
    /// Groceries and eating out.
    pub food_costs: Option<String>,
    /// Electricity bill.
    pub electricity: Option<String>,
    /// Gas bill.
    pub gas: Option<String>,
    /// Water bill.
    pub water: Option<String>,
    /// Everything that does not fit the other categories.
    pub misc: Option<String>,
}

/// Parse a raw form amount, coercing missing or non-numeric values to zero.
fn parse_amount(raw: &Option<String>) -> i64 {
    raw.as_deref()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

/// A route handler that computes or fetches a budget prediction for the
/// submitted figures, stores the resulting record, and renders the result.
pub async fn submit_prediction_endpoint(
    State(state): State<SubmitPredictionState>,
    Form(form): Form<PredictForm>,
) -> Result<Response, Error> {
    let income = parse_amount(&form.income);
    let expenses = ExpenseBreakdown {
        house_rent: parse_amount(&form.house_rent),
        food_costs: parse_amount(&form.food_costs),
        electricity: parse_amount(&form.electricity),
        gas: parse_amount(&form.gas),
        water: parse_amount(&form.water),
        misc: parse_amount(&form.misc),
    };
    let month = form
        .month
        .as_deref()
        .and_then(normalize_month_label)
        .unwrap_or_else(default_month_label);

    // The gateway call may take up to the remote timeout, so it must finish
    // before the store lock is taken.
    let prediction = state.gateway.predict(income, &expenses).await;

    let new_record = NewBudgetRecord {
        month,
        income,
        expenses,
        real_expense: expenses.total(),
        predicted_baseline: prediction.predicted_baseline,
        account_balance: prediction.account_balance,
        savings_balance: prediction.savings_balance,
        status: prediction.status,
    };

    let record = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        insert_budget_record(new_record, &connection)
            .inspect_err(|error| tracing::error!("could not store budget record: {error}"))?
    };

    Ok(prediction_result_view(&record, &prediction.insights).into_response())
}

fn breakdown_row(label: &str, amount: i64) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            th scope="row" class=(TABLE_CELL_STYLE) { (label) }
            td class=(TABLE_CELL_STYLE) { (format_currency(amount)) }
        }
    }
}

fn prediction_result_view(record: &BudgetRecord, insights: &Option<Value>) -> Markup {
    let nav_bar = NavBar::new(endpoints::PREDICT).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Prediction for " (record.month) }

            dl class="grid grid-cols-2 gap-4 mt-6"
            {
                dt class="font-medium" { "Income" }
                dd id="income" { (format_currency(record.income)) }

                dt class="font-medium" { "Actual Expense" }
                dd id="real-expense" { (format_currency(record.real_expense)) }

                dt class="font-medium" { "Predicted Baseline" }
                dd id="predicted-baseline" { (format_currency(record.predicted_baseline)) }

                dt class="font-medium" { "Account Balance" }
                dd id="account-balance" { (format_currency(record.account_balance)) }

                dt class="font-medium" { "Savings Balance" }
                dd id="savings-balance" { (format_currency(record.savings_balance)) }

                dt class="font-medium" { "Status" }
                dd id="status" { (record.status) }
            }

            div class="overflow-x-auto rounded-lg shadow mt-8"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        }
                    }
                    tbody
                    {
                        (breakdown_row("House Rent", record.expenses.house_rent))
                        (breakdown_row("Food Costs", record.expenses.food_costs))
                        (breakdown_row("Electricity", record.expenses.electricity))
                        (breakdown_row("Gas", record.expenses.gas))
                        (breakdown_row("Water", record.expenses.water))
                        (breakdown_row("Miscellaneous", record.expenses.misc))
                    }
                }
            }

            @if let Some(insights) = insights
            {
                div class="mt-8 w-full max-w-xl"
                {
                    h3 class="text-lg font-semibold" { "Spending Insights" }

                    pre id="insights" class="mt-2 p-4 rounded bg-gray-100 dark:bg-gray-800 overflow-x-auto"
                    {
                        (serde_json::to_string_pretty(insights).unwrap_or_default())
                    }
                }
            }

            a href=(endpoints::DASHBOARD_VIEW) class={"mt-8 " (LINK_STYLE)} { "View dashboard" }
        }
    };

    base("Prediction Result", &[], &content)
}

#[cfg(test)]
mod submit_prediction_tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::extract::State;
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        Error,
        budget::{BudgetStatus, create_budget_table, get_budget_records},
        predict::{GatewayConfig, PredictionGateway},
    };

    use super::{PredictForm, SubmitPredictionState, parse_amount, submit_prediction_endpoint};

    fn unreachable_gateway() -> PredictionGateway {
        PredictionGateway::new(GatewayConfig {
            predict_url: "http://127.0.0.1:1/predict".to_owned(),
            insights_url: "http://127.0.0.1:1/api/recommendations".to_owned(),
            timeout: Duration::from_millis(500),
        })
    }

    fn get_test_state() -> SubmitPredictionState {
        let connection = Connection::open_in_memory().unwrap();
        create_budget_table(&connection).expect("Could not create budget record table");

        SubmitPredictionState {
            db_connection: Arc::new(Mutex::new(connection)),
            gateway: unreachable_gateway(),
        }
    }

    fn sample_form() -> PredictForm {
        PredictForm {
            month: Some("January 2024".to_owned()),
            income: Some("3000".to_owned()),
            house_rent: Some("1000".to_owned()),
            food_costs: Some("500".to_owned()),
            electricity: Some("100".to_owned()),
            gas: Some("50".to_owned()),
            water: Some("30".to_owned()),
            misc: Some("20".to_owned()),
        }
    }

    #[test]
    fn missing_and_malformed_amounts_are_coerced_to_zero() {
        assert_eq!(parse_amount(&None), 0);
        assert_eq!(parse_amount(&Some("".to_owned())), 0);
        assert_eq!(parse_amount(&Some("abc".to_owned())), 0);
        assert_eq!(parse_amount(&Some(" 42 ".to_owned())), 42);
        assert_eq!(parse_amount(&Some("-7".to_owned())), -7);
    }

    #[tokio::test]
    async fn successful_submission_stores_exactly_one_record() {
        let state = get_test_state();

        let response = submit_prediction_endpoint(State(state.clone()), Form(sample_form()))
            .await
            .expect("expected the submission to succeed");

        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        let records = get_budget_records(None, &connection).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.month, "january 2024");
        assert_eq!(record.income, 3000);
        assert_eq!(record.real_expense, 1700);
        // Unreachable prediction service: the baseline falls back to the
        // category sum.
        assert_eq!(record.predicted_baseline, 1700);
        assert_eq!(record.account_balance, 1300);
        assert_eq!(record.savings_balance, 1300);
        assert_eq!(record.status, BudgetStatus::Good);
    }

    #[tokio::test]
    async fn deficit_submission_is_recorded_as_over_budget() {
        let state = get_test_state();
        let form = PredictForm {
            month: Some("february 2024".to_owned()),
            income: Some("1000".to_owned()),
            house_rent: Some("1500".to_owned()),
            ..Default::default()
        };

        submit_prediction_endpoint(State(state.clone()), Form(form))
            .await
            .unwrap();

        let connection = state.db_connection.lock().unwrap();
        let records = get_budget_records(None, &connection).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].account_balance, -500);
        assert_eq!(records[0].savings_balance, -500);
        assert_eq!(records[0].status, BudgetStatus::OverBudget);
    }

    #[tokio::test]
    async fn missing_month_defaults_to_the_current_month() {
        let state = get_test_state();
        let form = PredictForm {
            month: None,
            ..sample_form()
        };

        submit_prediction_endpoint(State(state.clone()), Form(form))
            .await
            .unwrap();

        let connection = state.db_connection.lock().unwrap();
        let records = get_budget_records(None, &connection).unwrap();

        assert_eq!(records[0].month, crate::budget::default_month_label());
    }

    #[tokio::test]
    async fn blank_month_defaults_to_the_current_month() {
        let state = get_test_state();
        let form = PredictForm {
            month: Some("   ".to_owned()),
            ..sample_form()
        };

        submit_prediction_endpoint(State(state.clone()), Form(form))
            .await
            .unwrap();

        let connection = state.db_connection.lock().unwrap();
        let records = get_budget_records(None, &connection).unwrap();

        assert_eq!(records[0].month, crate::budget::default_month_label());
    }

    #[tokio::test]
    async fn failed_persistence_leaves_no_record() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            connection.execute("DROP TABLE budget_record;", ()).unwrap();
        }

        let result = submit_prediction_endpoint(State(state.clone()), Form(sample_form())).await;

        assert!(matches!(result, Err(Error::SqlError(_))));

        let connection = state.db_connection.lock().unwrap();
        crate::budget::create_budget_table(&connection).unwrap();
        assert!(get_budget_records(None, &connection).unwrap().is_empty());
    }
}
