//! A best-effort client for the external prediction services.
//!
//! The primary service computes a predicted baseline expense from the
//! submitted figures. When it is unreachable, times out, or returns a
//! malformed response, the gateway falls back to a local heuristic (the
//! predicted baseline is the sum of the category amounts) and
//! opportunistically asks a secondary service for spending insights to
//! enrich the response. Neither service is ever retried, and no remote
//! failure is surfaced to the client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::budget::{BudgetStatus, ExpenseBreakdown};

/// The default address of the primary prediction service.
pub const DEFAULT_PREDICT_URL: &str = "http://127.0.0.1:8080/predict";

/// The default address of the secondary insights service.
pub const DEFAULT_INSIGHTS_URL: &str = "http://127.0.0.1:5000/api/recommendations";

/// How long to wait on each remote service before giving up on it.
const REMOTE_TIMEOUT: Duration = Duration::from_secs(8);

/// Where to find the external prediction services and how long to wait for
/// them.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// The URL of the primary prediction endpoint.
    pub predict_url: String,
    /// The URL of the secondary insights endpoint.
    pub insights_url: String,
    /// The per-request timeout applied to both endpoints.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            predict_url: DEFAULT_PREDICT_URL.to_owned(),
            insights_url: DEFAULT_INSIGHTS_URL.to_owned(),
            timeout: REMOTE_TIMEOUT,
        }
    }
}

/// The outcome of a prediction: the baseline and the balances and status
/// derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// The expected expense for the month.
    pub predicted_baseline: i64,
    /// Income minus the actual expense.
    pub account_balance: i64,
    /// Income minus the predicted baseline.
    pub savings_balance: i64,
    /// How the month measures up against the baseline.
    pub status: BudgetStatus,
    /// Opaque insight data from the secondary service, attached only when
    /// the primary service was unavailable and the secondary call happened
    /// to succeed.
    pub insights: Option<Value>,
}

/// The request body sent to the primary prediction service.
#[derive(Debug, Serialize)]
struct PredictRequest {
    income: i64,
    house_rent: i64,
    food_costs: i64,
    electricity: i64,
    gas: i64,
    water: i64,
    misc: i64,
}

/// The response body expected from the primary prediction service.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    predicted_baseline: Option<f64>,
    actual_expense: Option<f64>,
    status: Option<String>,
}

/// The response body expected from the secondary insights service.
#[derive(Debug, Deserialize)]
struct InsightsResponse {
    status: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
enum GatewayError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("response did not contain a predicted baseline")]
    MissingBaseline,
}

/// A client for the external prediction services.
#[derive(Debug, Clone)]
pub struct PredictionGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl PredictionGateway {
    /// Create a gateway whose requests are bounded by the configured
    /// timeout.
    pub fn new(config: GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Compute the prediction for a month's figures.
    ///
    /// Tries the primary prediction service first and falls back to the
    /// local heuristic when it is unavailable. This function always
    /// produces a [Prediction]; remote failures are logged and recovered.
    pub async fn predict(&self, income: i64, expenses: &ExpenseBreakdown) -> Prediction {
        let real_expense = expenses.total();

        match self.remote_prediction(income, expenses, real_expense).await {
            Ok(prediction) => prediction,
            Err(error) => {
                tracing::warn!("prediction service unavailable: {error}");
                self.local_fallback(income, real_expense).await
            }
        }
    }

    async fn remote_prediction(
        &self,
        income: i64,
        expenses: &ExpenseBreakdown,
        real_expense: i64,
    ) -> Result<Prediction, GatewayError> {
        let payload = PredictRequest {
            income,
            house_rent: expenses.house_rent,
            food_costs: expenses.food_costs,
            electricity: expenses.electricity,
            gas: expenses.gas,
            water: expenses.water,
            misc: expenses.misc,
        };

        let response: PredictResponse = self
            .client
            .post(&self.config.predict_url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let predicted_baseline = response
            .predicted_baseline
            .ok_or(GatewayError::MissingBaseline)?
            .round() as i64;

        let actual_expense = response
            .actual_expense
            .map(|expense| expense.round() as i64)
            .unwrap_or(real_expense);
        let account_balance = income - actual_expense;

        // The model reports its own status label. Without one, the original
        // service contract derives a two-valued status from the account
        // balance on this path, mapping zero to Over Budget.
        let status = response
            .status
            .as_deref()
            .and_then(BudgetStatus::from_label)
            .unwrap_or(if account_balance > 0 {
                BudgetStatus::Good
            } else {
                BudgetStatus::OverBudget
            });

        Ok(Prediction {
            predicted_baseline,
            account_balance,
            savings_balance: income - predicted_baseline,
            status,
            insights: None,
        })
    }

    async fn local_fallback(&self, income: i64, real_expense: i64) -> Prediction {
        let savings_balance = income - real_expense;

        Prediction {
            predicted_baseline: real_expense,
            account_balance: income - real_expense,
            savings_balance,
            status: BudgetStatus::from_savings_balance(savings_balance),
            insights: self.fetch_insights(income, real_expense).await,
        }
    }

    /// Ask the secondary service for spending insights. Failures are
    /// swallowed: insights enrich the response but never block it.
    async fn fetch_insights(&self, income: i64, monthly_expenses: i64) -> Option<Value> {
        let payload = json!({
            "monthly_income": income,
            "monthly_expenses": monthly_expenses,
            "age": 30,
            "dependents": 1,
            "income_stability": 3,
        });

        let response = self
            .client
            .post(&self.config.insights_url)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!("insights service unavailable: {error}");
                return None;
            }
        };

        match response.json::<InsightsResponse>().await {
            Ok(insights) if insights.status == "success" => insights.data,
            Ok(insights) => {
                tracing::warn!("insights service reported status {:?}", insights.status);
                None
            }
            Err(error) => {
                tracing::warn!("could not parse insights response: {error}");
                None
            }
        }
    }
}

#[cfg(test)]
mod gateway_tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use crate::budget::{BudgetStatus, ExpenseBreakdown};

    use super::{GatewayConfig, PredictionGateway};

    fn sample_expenses() -> ExpenseBreakdown {
        ExpenseBreakdown {
            house_rent: 1000,
            food_costs: 500,
            electricity: 100,
            gas: 50,
            water: 30,
            misc: 20,
        }
    }

    fn gateway_for(server: &MockServer) -> PredictionGateway {
        PredictionGateway::new(GatewayConfig {
            predict_url: format!("{}/predict", server.uri()),
            insights_url: format!("{}/api/recommendations", server.uri()),
            timeout: Duration::from_millis(500),
        })
    }

    /// A gateway pointed at an address nothing is listening on.
    fn unreachable_gateway() -> PredictionGateway {
        PredictionGateway::new(GatewayConfig {
            predict_url: "http://127.0.0.1:1/predict".to_owned(),
            insights_url: "http://127.0.0.1:1/api/recommendations".to_owned(),
            timeout: Duration::from_millis(500),
        })
    }

    #[tokio::test]
    async fn unreachable_service_falls_back_to_category_sum() {
        let gateway = unreachable_gateway();

        let prediction = gateway.predict(3000, &sample_expenses()).await;

        assert_eq!(prediction.predicted_baseline, 1700);
        assert_eq!(prediction.account_balance, 1300);
        assert_eq!(prediction.savings_balance, 1300);
        assert_eq!(prediction.status, BudgetStatus::Good);
        assert_eq!(prediction.insights, None);
    }

    #[tokio::test]
    async fn fallback_with_deficit_is_over_budget() {
        let gateway = unreachable_gateway();
        let expenses = ExpenseBreakdown {
            house_rent: 1500,
            ..Default::default()
        };

        let prediction = gateway.predict(1000, &expenses).await;

        assert_eq!(prediction.predicted_baseline, 1500);
        assert_eq!(prediction.account_balance, -500);
        assert_eq!(prediction.savings_balance, -500);
        assert_eq!(prediction.status, BudgetStatus::OverBudget);
    }

    #[tokio::test]
    async fn fallback_with_exact_break_even_is_balanced() {
        let gateway = unreachable_gateway();
        let expenses = ExpenseBreakdown {
            house_rent: 1000,
            ..Default::default()
        };

        let prediction = gateway.predict(1000, &expenses).await;

        assert_eq!(prediction.status, BudgetStatus::Balanced);
    }

    #[tokio::test]
    async fn remote_prediction_rounds_the_baseline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_partial_json(json!({"income": 3000, "house_rent": 1000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "predicted_baseline": 1650.4,
                "actual_expense": 1699.6,
                "status": "Good",
            })))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let prediction = gateway.predict(3000, &sample_expenses()).await;

        assert_eq!(prediction.predicted_baseline, 1650);
        assert_eq!(prediction.account_balance, 3000 - 1700);
        assert_eq!(prediction.savings_balance, 3000 - 1650);
        assert_eq!(prediction.status, BudgetStatus::Good);
        assert_eq!(prediction.insights, None);
    }

    #[tokio::test]
    async fn remote_prediction_without_actual_expense_uses_local_sum() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "predicted_baseline": 1800.0,
            })))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let prediction = gateway.predict(3000, &sample_expenses()).await;

        assert_eq!(prediction.predicted_baseline, 1800);
        // actual expense defaults to the locally-summed 1700
        assert_eq!(prediction.account_balance, 1300);
        assert_eq!(prediction.status, BudgetStatus::Good);
    }

    #[tokio::test]
    async fn remote_status_derivation_maps_zero_balance_to_over_budget() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "predicted_baseline": 1700.0,
                "actual_expense": 1000.0,
            })))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let prediction = gateway.predict(1000, &sample_expenses()).await;

        assert_eq!(prediction.account_balance, 0);
        assert_eq!(prediction.status, BudgetStatus::OverBudget);
    }

    #[tokio::test]
    async fn malformed_response_is_treated_as_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "unexpected": true,
            })))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let prediction = gateway.predict(3000, &sample_expenses()).await;

        assert_eq!(prediction.predicted_baseline, 1700);
        assert_eq!(prediction.status, BudgetStatus::Good);
    }

    #[tokio::test]
    async fn slow_service_times_out_and_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"predicted_baseline": 9999.0}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let prediction = gateway.predict(3000, &sample_expenses()).await;

        assert_eq!(prediction.predicted_baseline, 1700);
    }

    #[tokio::test]
    async fn insights_are_attached_on_the_fallback_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/recommendations"))
            .and(body_partial_json(json!({
                "monthly_income": 3000,
                "monthly_expenses": 1700,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"recommendation": "Reduce misc spending"},
            })))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let prediction = gateway.predict(3000, &sample_expenses()).await;

        assert_eq!(prediction.predicted_baseline, 1700);
        assert_eq!(
            prediction.insights,
            Some(json!({"recommendation": "Reduce misc spending"}))
        );
    }

    #[tokio::test]
    async fn unsuccessful_insights_status_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/recommendations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "data": {"reason": "model not loaded"},
            })))
            .mount(&server)
            .await;
        let gateway = gateway_for(&server);

        let prediction = gateway.predict(3000, &sample_expenses()).await;

        assert_eq!(prediction.insights, None);
    }
}
