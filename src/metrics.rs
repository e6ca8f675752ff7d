use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

pub const REQUESTS_TOTAL: &str = "valuation_requests_total";
pub const DURATION_MS: &str = "valuation_duration_ms";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the request series.
    /// Fails if a recorder is already installed in this process.
    pub fn init() -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!(REQUESTS_TOTAL, "Scoring requests served, by route.");
        describe_histogram!(DURATION_MS, "Scoring time in milliseconds, by route.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        routes(self.handle.clone())
    }
}

pub fn routes(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let h = handle.clone();
            async move { h.render() }
        }),
    )
}

/// Count one request on `route` and record its elapsed time.
/// No-op when no recorder is installed.
pub fn observe(route: &'static str, started: Instant) {
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    counter!(REQUESTS_TOTAL, "route" => route).increment(1);
    histogram!(DURATION_MS, "route" => route).record(ms);
}
