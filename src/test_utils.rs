//! Helpers shared between tests.
#![allow(missing_docs)]

use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

/// Read a response body to completion and return it as text.
pub(crate) async fn response_body_text(response: Response<Body>) -> String {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

/// The text content of the first element matching `css_selector`, if any.
pub(crate) fn element_text(html: &str, css_selector: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(css_selector).expect("Invalid CSS selector");

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
}
