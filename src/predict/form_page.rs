//! Defines the route handler for the monthly budget submission form.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    navigation::NavBar,
    view_templates::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
};

fn amount_field(name: &str, label: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type="number"
                placeholder="0"
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// Display the form for submitting a month's income and expense figures.
pub async fn get_predict_page() -> Response {
    let nav_bar = NavBar::new(endpoints::PREDICT).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form method="post" action=(endpoints::PREDICT) class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Predict This Month's Budget" }

                div
                {
                    label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                    input
                        name="month"
                        id="month"
                        type="text"
                        placeholder="e.g. january 2024 (defaults to the current month)"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (amount_field("income", "Monthly Income"))
                (amount_field("house_rent", "House Rent"))
                (amount_field("food_costs", "Food Costs"))
                (amount_field("electricity", "Electricity"))
                (amount_field("gas", "Gas"))
                (amount_field("water", "Water"))
                (amount_field("misc", "Miscellaneous"))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Get Prediction" }
            }
        }
    };

    base("New Prediction", &[], &content).into_response()
}
