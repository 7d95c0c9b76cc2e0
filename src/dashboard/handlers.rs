//! Dashboard HTTP handler and view assembly.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    budget::{BudgetRecord, get_budget_records, get_distinct_months, get_latest_budget_record},
    endpoints,
    navigation::NavBar,
    view_templates::{PAGE_CONTAINER_STYLE, base},
};

use super::{
    aggregation::{BalanceTotals, calculate_balance_totals},
    tables::{month_filter_form, records_table, summary_cards},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading budget records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Show only records whose month label matches exactly. An empty value
    /// means no filter.
    pub month: Option<String>,
}

/// Display a page with an overview of all recorded months.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let month_filter = query
        .month
        .as_deref()
        .filter(|month| !month.is_empty());

    let records = get_budget_records(month_filter, &connection)
        .inspect_err(|error| tracing::error!("could not load budget records: {error}"))?;
    let latest = get_latest_budget_record(&connection)
        .inspect_err(|error| tracing::error!("could not load latest budget record: {error}"))?;
    let months = get_distinct_months(&connection)
        .inspect_err(|error| tracing::error!("could not load month labels: {error}"))?;

    let totals = calculate_balance_totals(&records);

    Ok(dashboard_view(&records, &latest, &months, &totals, month_filter).into_response())
}

fn dashboard_view(
    records: &[BudgetRecord],
    latest: &Option<BudgetRecord>,
    months: &[String],
    totals: &BalanceTotals,
    month_filter: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-6" { "Dashboard" }

            (summary_cards(totals, latest))

            (month_filter_form(months, month_filter))

            @if records.is_empty()
            {
                p id="no-records" class="mt-6"
                {
                    "No budget records yet. Submit a month from the prediction page to get started."
                }
            }
            @else
            {
                (records_table(records))
            }
        }
    };

    base("Dashboard", &[], &content)
}
