//! Pricing confidence bands: an uncertainty fraction per content format,
//! later applied symmetrically around a point price.
//!
//! Base uncertainty (0.20 ± quality/professional/follower/topic terms,
//! clamped to [0.08, 0.40]) feeds four per-format corrections.

use serde::{Deserialize, Serialize};

use crate::score::round_half_up;
use crate::signal::ResolvedSignal;

const BASE_UNCERTAINTY: f64 = 0.20;

/// Topic → base uncertainty delta. First match wins.
const TOPIC_VOLATILITY: &[(&str, f64)] = &[("旅遊", 0.03), ("美食", -0.02), ("時尚", 0.02)];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBands {
    pub post: f64,
    pub story: f64,
    pub reels: f64,
    pub monthly: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Post,
    Story,
    Reels,
    Monthly,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 4] = [
        ContentFormat::Post,
        ContentFormat::Story,
        ContentFormat::Reels,
        ContentFormat::Monthly,
    ];

    /// Inclusive clamp range of the band for this format.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            ContentFormat::Post => (0.08, 0.35),
            ContentFormat::Story => (0.10, 0.38),
            ContentFormat::Reels => (0.12, 0.40),
            ContentFormat::Monthly => (0.08, 0.30),
        }
    }

    /// Monetary baseline this format is priced from.
    pub fn value_of(self, signal: &ResolvedSignal) -> f64 {
        match self {
            ContentFormat::Post => signal.post_value,
            ContentFormat::Story => signal.story_value,
            ContentFormat::Reels => signal.reels_value,
            ContentFormat::Monthly => signal.monthly_package,
        }
    }
}

impl ConfidenceBands {
    pub fn get(&self, format: ContentFormat) -> f64 {
        match format {
            ContentFormat::Post => self.post,
            ContentFormat::Story => self.story,
            ContentFormat::Reels => self.reels,
            ContentFormat::Monthly => self.monthly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub lower: i64,
    pub upper: i64,
    pub confidence: f64,
    pub range: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceDisplay {
    pub display: String,
    pub lower: i64,
    pub upper: i64,
    /// Band as a rounded percentage.
    pub confidence: i64,
}

pub fn get_confidence_bands(signal: &ResolvedSignal) -> ConfidenceBands {
    let base = base_uncertainty(signal);
    ConfidenceBands {
        post: format_confidence(ContentFormat::Post, base, signal),
        story: format_confidence(ContentFormat::Story, base, signal),
        reels: format_confidence(ContentFormat::Reels, base, signal),
        monthly: format_confidence(ContentFormat::Monthly, base, signal),
    }
}

pub fn base_uncertainty(signal: &ResolvedSignal) -> f64 {
    let mut u = BASE_UNCERTAINTY;

    if signal.overall > 8.0 {
        u -= 0.05;
    } else if signal.overall < 6.0 {
        u += 0.08;
    }

    if signal.professional_multiplier > 1.5 {
        u -= 0.06;
    } else if signal.professional_multiplier < 1.2 {
        u += 0.04;
    }

    if signal.follower_multiplier > 1.5 {
        u -= 0.03;
    } else if signal.follower_multiplier < 1.1 {
        u += 0.05;
    }

    if let Some((_, delta)) = TOPIC_VOLATILITY
        .iter()
        .find(|(k, _)| signal.topic.mentions(k))
    {
        u += delta;
    }

    u.clamp(0.08, 0.40)
}

/// Format offset, value tier and quality corrections on top of `base`.
pub fn format_confidence(format: ContentFormat, base: f64, signal: &ResolvedSignal) -> f64 {
    let value = format.value_of(signal);
    let quality_gap = 7.0 - signal.overall;

    let c = match format {
        ContentFormat::Post => {
            base + value_tier(value, 50_000.0, -0.03, 10_000.0, 0.04) + quality_gap * 0.005
        }
        ContentFormat::Story => {
            base + 0.02 + value_tier(value, 20_000.0, -0.02, 5_000.0, 0.05) + quality_gap * 0.008
        }
        ContentFormat::Reels => {
            base + 0.05
                + value_tier(value, 100_000.0, -0.04, 20_000.0, 0.06)
                + (6.0 - signal.editing) * 0.01
                + quality_gap * 0.01
        }
        ContentFormat::Monthly => {
            base - 0.03 + value_tier(value, 200_000.0, -0.04, 50_000.0, 0.03)
                - (signal.professional_multiplier - 1.0) * 0.02
                - (signal.follower_multiplier - 1.0) * 0.015
        }
    };

    let (lo, hi) = format.bounds();
    c.clamp(lo, hi)
}

fn value_tier(value: f64, high: f64, high_delta: f64, low: f64, low_delta: f64) -> f64 {
    if value > high {
        high_delta
    } else if value < low {
        low_delta
    } else {
        0.0
    }
}

/// Symmetric range around `center`; `lower` never goes below 0 and `upper`
/// never below `lower`. Out-of-range casts saturate.
pub fn calculate_price_bounds(center: f64, confidence: f64) -> PriceBounds {
    let lower = round_half_up(center * (1.0 - confidence)).max(0.0) as i64;
    let upper = (round_half_up(center * (1.0 + confidence)) as i64).max(lower);
    PriceBounds {
        lower,
        upper,
        confidence,
        range: upper.saturating_sub(lower),
    }
}

pub fn format_confidence_display(center: f64, confidence: f64) -> ConfidenceDisplay {
    let bounds = calculate_price_bounds(center, confidence);
    let pct = round_half_up(confidence * 100.0) as i64;
    ConfidenceDisplay {
        display: format!(
            "估計區間：NT$ {} ~ NT$ {}（±{}%）",
            group_thousands(bounds.lower),
            group_thousands(bounds.upper),
            pct
        ),
        lower: bounds.lower,
        upper: bounds.upper,
        confidence: pct,
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
