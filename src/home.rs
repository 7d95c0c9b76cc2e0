//! Defines the route handler for the landing page.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    navigation::NavBar,
    view_templates::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base},
};

/// Display the landing page.
pub async fn get_home_page() -> Response {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-4xl font-bold mt-8" { "Plan your month, keep your goals." }

            p class="mt-4 max-w-xl text-center"
            {
                "Enter your monthly income and expenses to get a predicted \
                spending baseline, then track how each month measured up on \
                the dashboard."
            }

            div class="flex flex-row gap-4 mt-8"
            {
                a href=(endpoints::PREDICT) class=(BUTTON_PRIMARY_STYLE)
                {
                    "New Prediction"
                }

                a href=(endpoints::DASHBOARD_VIEW) class=(BUTTON_PRIMARY_STYLE)
                {
                    "Dashboard"
                }
            }
        }
    };

    base("Home", &[], &content).into_response()
}
