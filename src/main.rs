//! The HTTP server for MoneyGoals.

use std::net::{IpAddr, SocketAddr};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use moneygoals::{
    AppState, DEFAULT_INSIGHTS_URL, DEFAULT_PREDICT_URL, GatewayConfig, build_router,
    delete_all_budget_records, graceful_shutdown,
};

/// The web server for MoneyGoals, a monthly budget tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "MONEYGOALS_DB")]
    db_path: String,

    /// The address to serve the application from.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// The port to serve the application from.
    #[arg(short, long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// The URL of the primary prediction service.
    #[arg(long, env = "PREDICT_URL", default_value = DEFAULT_PREDICT_URL)]
    predict_url: String,

    /// The URL of the secondary insights service.
    #[arg(long, env = "INSIGHTS_URL", default_value = DEFAULT_INSIGHTS_URL)]
    insights_url: String,

    /// Delete all stored budget records at startup. Intended for
    /// development only.
    #[arg(long, default_value_t = false)]
    reset_store: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open database at {:?}: {error}", args.db_path);
            return;
        }
    };

    let gateway_config = GatewayConfig {
        predict_url: args.predict_url,
        insights_url: args.insights_url,
        ..GatewayConfig::default()
    };

    let state = match AppState::new(connection, gateway_config) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize the database: {error}");
            return;
        }
    };

    if args.reset_store {
        tracing::warn!("--reset-store is set, deleting all stored budget records");

        let reset_result = state
            .db_connection
            .lock()
            .map_err(|_| moneygoals::Error::DatabaseLockError)
            .and_then(|connection| delete_all_budget_records(&connection));

        if let Err(error) = reset_result {
            tracing::error!("Could not reset the store: {error}");
            return;
        }
    }

    let addr = SocketAddr::new(args.host, args.port);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
    }
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().pretty().with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            ),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
