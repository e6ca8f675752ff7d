//! Creator Valuation Service: binary entrypoint.
//! Boots the Axum HTTP server with config hot reload and Prometheus metrics.

use anyhow::Context;
use creator_valuation::{api, metrics::Metrics, AppState};
use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - VALUATION_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("VALUATION_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("valuation=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let state = AppState::from_env().context("loading valuation config")?;
    let metrics = Metrics::init()?;
    let state = state.with_metrics(metrics.handle.clone());

    info!(target: "valuation", "router ready");
    Ok(api::router(state).into())
}
