// src/score/mod.rs
//! Scoring pipeline entry: resolves the signal once and runs the four
//! independent scorers (audience, brand fit, pricing confidence, travel).
//!
//! Every scorer is a pure function of `&ResolvedSignal`; they share no state
//! and can run in any order or in parallel.

pub mod audience;
pub mod brand_fit;
pub mod pricing;
pub mod travel;

use serde::{Deserialize, Serialize};

use crate::signal::{ContentSignal, ResolvedSignal, SignalDefaults};

// Re-export convenient types.
pub use crate::score::audience::{synthesize_audience, AudienceProfile};
pub use crate::score::brand_fit::{
    calculate_brand_potential, compute_brand_fit, partnership_suggestions, BrandFitReport,
    BrandPotential,
};
pub use crate::score::pricing::{
    calculate_price_bounds, format_confidence_display, get_confidence_bands, ConfidenceBands,
    ConfidenceDisplay, ContentFormat, PriceBounds,
};
pub use crate::score::travel::{calculate_overall_travel_score, synthesize_travel_split, TravelSplit};

/// Price ranges rendered around each format's monetary baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRanges {
    pub post: ConfidenceDisplay,
    pub story: ConfidenceDisplay,
    pub reels: ConfidenceDisplay,
    pub monthly: ConfidenceDisplay,
}

/// Composite response merging every scorer output for one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub audience: AudienceProfile,
    pub brand_fit: BrandFitReport,
    pub brand_potential: BrandPotential,
    pub partnership_suggestions: Vec<String>,
    pub confidence_bands: ConfidenceBands,
    pub price_ranges: PriceRanges,
    pub travel_split: TravelSplit,
    pub travel_score: f64,
}

/// Run all scorers against one signal.
pub fn valuate(signal: &ContentSignal, defaults: &SignalDefaults) -> ValuationReport {
    let resolved = signal.resolve(defaults);

    let brand_fit = compute_brand_fit(&resolved);
    let brand_potential = calculate_brand_potential(&brand_fit);
    let suggestions = partnership_suggestions(&brand_fit);

    let bands = get_confidence_bands(&resolved);
    let price_ranges = price_ranges(&resolved, &bands);

    ValuationReport {
        audience: synthesize_audience(&resolved),
        brand_fit,
        brand_potential,
        partnership_suggestions: suggestions,
        confidence_bands: bands,
        price_ranges,
        travel_split: synthesize_travel_split(&resolved),
        travel_score: calculate_overall_travel_score(&resolved),
    }
}

/// Display ranges for every format, each band applied to its own baseline.
pub fn price_ranges(signal: &ResolvedSignal, bands: &ConfidenceBands) -> PriceRanges {
    let range_for = |format: ContentFormat| {
        format_confidence_display(format.value_of(signal), bands.get(format))
    };
    PriceRanges {
        post: range_for(ContentFormat::Post),
        story: range_for(ContentFormat::Story),
        reels: range_for(ContentFormat::Reels),
        monthly: range_for(ContentFormat::Monthly),
    }
}

/// Half-up rounding (ties toward +∞), matching how displayed prices and
/// scores have always been rounded.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_up_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(0.0), 0.0);
    }

    #[test]
    fn valuate_applies_bands_to_baselines() {
        let signal = ContentSignal::new("美食料理")
            .with_visual("overall", 8.2)
            .with_value("post_value", 20_000)
            .with_value("monthly_package", "80000");
        let report = valuate(&signal, &SignalDefaults::default());

        let band = report.confidence_bands.post;
        let expected = calculate_price_bounds(20_000.0, band);
        assert_eq!(report.price_ranges.post.lower, expected.lower);
        assert_eq!(report.price_ranges.post.upper, expected.upper);
        assert!(report.price_ranges.monthly.upper > 80_000);
        assert_eq!(report.price_ranges.story.lower, 0);
        assert_eq!(report.price_ranges.story.upper, 0);
    }

    #[test]
    fn valuate_honours_custom_defaults() {
        let defaults = SignalDefaults {
            overall: 9.0,
            ..SignalDefaults::default()
        };
        let with_custom = valuate(&ContentSignal::default(), &defaults);
        let with_builtin = valuate(&ContentSignal::default(), &SignalDefaults::default());
        assert!(with_custom.audience.male_ratio > with_builtin.audience.male_ratio);
    }

    #[test]
    fn report_serializes_deterministically() {
        let signal = ContentSignal::new("旅遊").with_visual("overall", 8.5);
        let a = serde_json::to_string(&valuate(&signal, &SignalDefaults::default())).unwrap();
        let b = serde_json::to_string(&valuate(&signal, &SignalDefaults::default())).unwrap();
        assert_eq!(a, b);
    }
}
