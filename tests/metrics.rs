// tests/metrics.rs
//
// Installs the global Prometheus recorder, so this file holds a single test.

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use creator_valuation::api::{self, AppState};
use creator_valuation::config::{HotReloadConfig, ValuationConfig};
use creator_valuation::metrics::Metrics;

#[tokio::test]
async fn metrics_endpoint_contains_request_series() {
    let metrics = Metrics::init().expect("install recorder");
    let state = AppState::new(HotReloadConfig::fixed(ValuationConfig::default()))
        .with_metrics(metrics.handle.clone());
    let app = api::router(state);

    let resp = app
        .clone()
        .oneshot(
            Request::post("/valuate")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"topic":"旅遊"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in ["valuation_requests_total", "valuation_duration_ms", "route=\"/valuate\""] {
        assert!(text.contains(needle), "missing '{needle}' in:\n{text}");
    }

    // Standalone router serves the same handle
    let resp = metrics
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // A second recorder cannot be installed
    assert!(Metrics::init().is_err());
}
