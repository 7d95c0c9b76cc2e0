//! The prediction request flow: the submission form, the gateway to the
//! external prediction services, and the endpoint that stores the result.

mod form_page;
mod gateway;
mod submit_endpoint;

pub use form_page::get_predict_page;
pub use gateway::{
    DEFAULT_INSIGHTS_URL, DEFAULT_PREDICT_URL, GatewayConfig, Prediction, PredictionGateway,
};
pub use submit_endpoint::submit_prediction_endpoint;
