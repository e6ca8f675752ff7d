//! Audience profile synthesis: gender split, age buckets and city/style tags
//! inferred from topic, visual quality and professionalism.

use serde::{Deserialize, Serialize};

use crate::signal::ResolvedSignal;

const NEUTRAL_MALE_RATIO: f64 = 0.52;
const MALE_RATIO_FLOOR: f64 = 0.25;
const MALE_RATIO_CEIL: f64 = 0.75;
const MAX_CITY_STYLES: usize = 4;

/// Neutral age mass for 18-24, 25-34, 35-44, 45+.
const NEUTRAL_AGE: [f64; 4] = [0.30, 0.45, 0.18, 0.07];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceProfile {
    pub male_ratio: f64,
    pub female_ratio: f64,
    /// Shares for 18-24, 25-34, 35-44, 45+; always sums to 1.
    pub age_dist: [f64; 4],
    pub city_styles: Vec<String>,
}

/// Topic group → male ratio. First matching group wins.
const GENDER_LEAN: &[(&[&str], f64)] = &[
    (&["時尚", "美妝"], 0.38),
    (&["科技", "3C"], 0.62),
    (&["美食", "旅遊"], 0.48),
];

/// Topic → additive age deltas. First matching topic wins.
const AGE_SHIFT: &[(&str, [f64; 4])] = &[
    ("旅遊", [-0.08, 0.05, 0.03, 0.0]),
    ("美食", [0.04, 0.02, -0.03, -0.03]),
    ("時尚", [0.06, 0.01, -0.04, -0.03]),
];

const PROFESSIONAL_AGE_SHIFT: [f64; 4] = [-0.05, 0.03, 0.02, 0.0];

struct StyleSet {
    keyword: Option<&'static str>,
    base: [&'static str; 3],
    premium: [&'static str; 2],
}

/// Category tag sets; the keyword-less entry is the lifestyle default.
const STYLE_SETS: &[StyleSet] = &[
    StyleSet {
        keyword: Some("旅遊"),
        base: ["台北都會", "海島度假", "文化歷史"],
        premium: ["網美打卡", "秘境探索"],
    },
    StyleSet {
        keyword: Some("美食"),
        base: ["熱門商圈", "夜市小吃", "網美咖啡"],
        premium: ["米其林餐廳", "隱藏版小店"],
    },
    StyleSet {
        keyword: Some("時尚"),
        base: ["精品百貨", "設計選物", "潮流快閃"],
        premium: ["時尚週", "設計師品牌"],
    },
    StyleSet {
        keyword: None,
        base: ["生活機能", "社區小店", "郊外踏青"],
        premium: ["文青咖啡", "特色書店"],
    },
];

const ART_STYLES: [&str; 2] = ["藝術展覽", "文創園區"];
const BUSINESS_STYLES: [&str; 2] = ["商務中心", "會議空間"];

pub fn synthesize_audience(signal: &ResolvedSignal) -> AudienceProfile {
    let male_ratio = gender_ratio(signal);
    AudienceProfile {
        male_ratio,
        female_ratio: 1.0 - male_ratio,
        age_dist: age_distribution(signal),
        city_styles: city_styles(signal),
    }
}

pub fn gender_ratio(signal: &ResolvedSignal) -> f64 {
    let mut ratio = GENDER_LEAN
        .iter()
        .find(|(keywords, _)| signal.topic.mentions_any(keywords))
        .map(|&(_, r)| r)
        .unwrap_or(NEUTRAL_MALE_RATIO);

    if signal.overall > 8.0 {
        ratio += 0.05;
    } else if signal.overall < 6.0 {
        ratio -= 0.03;
    }

    if signal.professional_score > 7.0 {
        ratio += 0.04;
    }

    ratio.clamp(MALE_RATIO_FLOOR, MALE_RATIO_CEIL)
}

/// Buckets are not clamped before the divide, so a large negative delta can
/// survive normalization as a negative share. A negative total still divides;
/// only a zero or non-finite total falls back to the neutral baseline.
pub fn age_distribution(signal: &ResolvedSignal) -> [f64; 4] {
    let mut dist = [
        NEUTRAL_AGE[0] - (signal.overall - 7.0) * 0.02,
        NEUTRAL_AGE[1] + (signal.follower_multiplier - 1.0) * 0.1,
        NEUTRAL_AGE[2],
        NEUTRAL_AGE[3],
    ];

    if let Some((_, delta)) = AGE_SHIFT.iter().find(|(k, _)| signal.topic.mentions(k)) {
        add(&mut dist, delta);
    }
    if signal.professional_score > 7.0 {
        add(&mut dist, &PROFESSIONAL_AGE_SHIFT);
    }

    normalize(dist).unwrap_or_else(|| normalize(NEUTRAL_AGE).unwrap_or(NEUTRAL_AGE))
}

pub fn city_styles(signal: &ResolvedSignal) -> Vec<String> {
    let set = STYLE_SETS
        .iter()
        .find(|s| s.keyword.map_or(true, |k| signal.topic.mentions(k)))
        .unwrap_or(&STYLE_SETS[STYLE_SETS.len() - 1]);

    let mut styles: Vec<&str> = set.base.to_vec();
    if signal.overall > 7.0 {
        styles.extend(set.premium);
    }
    if signal.overall > 8.0 {
        styles.extend(ART_STYLES);
    }
    if signal.professional_score > 7.0 {
        styles.extend(BUSINESS_STYLES);
    }

    styles
        .into_iter()
        .take(MAX_CITY_STYLES)
        .map(str::to_string)
        .collect()
}

fn add(dist: &mut [f64; 4], delta: &[f64; 4]) {
    for (d, x) in dist.iter_mut().zip(delta) {
        *d += x;
    }
}

fn normalize(dist: [f64; 4]) -> Option<[f64; 4]> {
    let total: f64 = dist.iter().sum();
    if !total.is_finite() || total == 0.0 {
        return None;
    }
    Some(dist.map(|x| x / total))
}
