use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::baseline::{estimate_value, CreatorProfile, ValueEstimate};
use crate::config::HotReloadConfig;
use crate::metrics::{observe, routes as metrics_routes};
use crate::score::{
    self, calculate_brand_potential, calculate_overall_travel_score, calculate_price_bounds,
    compute_brand_fit, get_confidence_bands, partnership_suggestions, synthesize_audience,
    synthesize_travel_split, AudienceProfile, BrandFitReport, BrandPotential, ConfidenceBands,
    PriceBounds, PriceRanges, TravelSplit, ValuationReport,
};
use crate::signal::{fingerprint, ContentSignal, ResolvedSignal, SignalDefaults};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HotReloadConfig>,
    /// Mounts `/metrics` when set.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: HotReloadConfig) -> Self {
        Self {
            config: Arc::new(config),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Config from `$VALUATION_CONFIG_PATH` or `config/valuation.toml`.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(HotReloadConfig::from_env()?))
    }

    fn resolve(&self, signal: &ContentSignal) -> ResolvedSignal {
        signal.resolve(&self.defaults())
    }

    fn defaults(&self) -> SignalDefaults {
        self.config.current().defaults
    }
}

/// Build the HTTP router. Debug routes are mounted from the config as it
/// stands at build time.
pub fn router(state: AppState) -> Router {
    let debug_routes = state.config.current().server.debug_routes;
    let metrics = state.metrics.clone();

    let mut app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/valuate", post(valuate))
        .route("/audience", post(audience))
        .route("/brand-fit", post(brand_fit))
        .route("/pricing", post(pricing))
        .route("/travel", post(travel))
        .route("/price-bounds", get(price_bounds))
        .route("/baseline", post(baseline));

    if debug_routes {
        app = app.route("/debug/defaults", get(debug_defaults));
    }

    let mut app = app.layer(CorsLayer::very_permissive()).with_state(state);

    if let Some(handle) = metrics {
        app = app.merge(metrics_routes(handle));
    }
    app
}

async fn valuate(
    State(state): State<AppState>,
    Json(signal): Json<ContentSignal>,
) -> Json<ValuationReport> {
    let started = Instant::now();
    let report = score::valuate(&signal, &state.defaults());
    info!(
        target: "valuation",
        id = %fingerprint(&signal.topic),
        high_fit = report.brand_fit.high_fit_categories,
        "valuation computed"
    );
    observe("/valuate", started);
    Json(report)
}

async fn audience(
    State(state): State<AppState>,
    Json(signal): Json<ContentSignal>,
) -> Json<AudienceProfile> {
    let started = Instant::now();
    let profile = synthesize_audience(&state.resolve(&signal));
    info!(target: "valuation", id = %fingerprint(&signal.topic), "audience synthesized");
    observe("/audience", started);
    Json(profile)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BrandFitResponse {
    pub brand_fit: BrandFitReport,
    pub potential: BrandPotential,
    pub partnership_suggestions: Vec<String>,
}

async fn brand_fit(
    State(state): State<AppState>,
    Json(signal): Json<ContentSignal>,
) -> Json<BrandFitResponse> {
    let started = Instant::now();
    let report = compute_brand_fit(&state.resolve(&signal));
    let potential = calculate_brand_potential(&report);
    info!(
        target: "valuation",
        id = %fingerprint(&signal.topic),
        potential = potential.score,
        "brand fit computed"
    );
    observe("/brand-fit", started);
    Json(BrandFitResponse {
        partnership_suggestions: partnership_suggestions(&report),
        brand_fit: report,
        potential,
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricingResponse {
    pub confidence_bands: ConfidenceBands,
    pub price_ranges: PriceRanges,
}

async fn pricing(
    State(state): State<AppState>,
    Json(signal): Json<ContentSignal>,
) -> Json<PricingResponse> {
    let started = Instant::now();
    let resolved = state.resolve(&signal);
    let bands = get_confidence_bands(&resolved);
    info!(
        target: "valuation",
        id = %fingerprint(&signal.topic),
        post_band = bands.post,
        "confidence bands computed"
    );
    observe("/pricing", started);
    Json(PricingResponse {
        price_ranges: score::price_ranges(&resolved, &bands),
        confidence_bands: bands,
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TravelResponse {
    pub split: TravelSplit,
    pub score: f64,
}

async fn travel(
    State(state): State<AppState>,
    Json(signal): Json<ContentSignal>,
) -> Json<TravelResponse> {
    let started = Instant::now();
    let resolved = state.resolve(&signal);
    let resp = TravelResponse {
        split: synthesize_travel_split(&resolved),
        score: calculate_overall_travel_score(&resolved),
    };
    info!(target: "valuation", id = %fingerprint(&signal.topic), "travel split computed");
    observe("/travel", started);
    Json(resp)
}

#[derive(Debug, Deserialize)]
struct PriceBoundsQuery {
    center: f64,
    confidence: f64,
}

async fn price_bounds(Query(q): Query<PriceBoundsQuery>) -> Json<PriceBounds> {
    let started = Instant::now();
    let bounds = calculate_price_bounds(q.center, q.confidence);
    observe("/price-bounds", started);
    Json(bounds)
}

async fn baseline(Json(profile): Json<CreatorProfile>) -> Json<ValueEstimate> {
    let started = Instant::now();
    let estimate = estimate_value(&profile);
    info!(
        target: "valuation",
        id = %fingerprint(&profile.content_primary),
        tier = %estimate.follower_tier,
        post = estimate.post_value,
        "baseline estimated"
    );
    observe("/baseline", started);
    Json(estimate)
}

async fn debug_defaults(State(state): State<AppState>) -> Json<SignalDefaults> {
    Json(state.defaults())
}
