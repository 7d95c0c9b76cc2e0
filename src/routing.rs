//! Application router configuration.

use axum::{
    Router,
    routing::get,
};

use crate::{
    AppState, endpoints,
    dashboard::get_dashboard_page,
    home::get_home_page,
    not_found::get_404_not_found,
    predict::{get_predict_page, submit_prediction_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(
            endpoints::PREDICT,
            get(get_predict_page).post(submit_prediction_endpoint),
        )
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .fallback(get_404_not_found)
        .with_state(state)
}
