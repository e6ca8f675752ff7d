//! # Brand Fit
//! Compatibility between the content and a fixed catalog of brand categories.
//!
//! Per category: `base + content_match + visual + professional + follower`,
//! each adjustment clamped on its own, the sum clamped to [0.30, 0.98] and
//! reported as an integer 0–100. Categories come back sorted by score
//! (stable on catalog order for ties).

use serde::{Deserialize, Serialize};

use crate::signal::{ResolvedSignal, TopicText};
use crate::score::round_half_up;

/// Rounded score at or above which a category counts as high fit.
pub const HIGH_FIT_THRESHOLD: u32 = 75;
pub const MAX_SUGGESTIONS: usize = 3;

const SCORE_FLOOR: f64 = 0.30;
const SCORE_CEIL: f64 = 0.98;
const KEYWORD_BONUS: f64 = 0.08;
const CONTENT_MATCH_CAP: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandCategory {
    Travel,
    Food,
    Lifestyle,
    Fashion,
    Tech,
    Beauty,
}

/// One catalog row.
#[derive(Debug, Clone, Copy)]
pub struct BrandProfile {
    pub category: BrandCategory,
    pub label: &'static str,
    pub base_score: f64,
    pub keywords: &'static [&'static str],
    /// Related topics that earn a smaller cross-category bonus.
    pub affinity: (&'static [&'static str], f64),
    pub visual_weight: f64,
    pub professional_weight: f64,
    pub follower_amplifier: f64,
}

pub const CATALOG: [BrandProfile; 6] = [
    BrandProfile {
        category: BrandCategory::Travel,
        label: "旅宿/觀光",
        base_score: 0.82,
        keywords: &["旅遊", "自然", "戶外", "度假"],
        affinity: (&["生活", "日常"], 0.03),
        visual_weight: 0.02,
        professional_weight: 0.03,
        follower_amplifier: 1.0,
    },
    BrandProfile {
        category: BrandCategory::Food,
        label: "餐飲/食品",
        base_score: 0.78,
        keywords: &["美食", "餐廳", "料理", "小吃"],
        affinity: (&["旅遊", "生活"], 0.04),
        visual_weight: 0.02,
        professional_weight: 0.03,
        follower_amplifier: 1.0,
    },
    BrandProfile {
        category: BrandCategory::Lifestyle,
        label: "生活家電/日用品",
        base_score: 0.75,
        keywords: &["生活", "日常", "居家", "家電"],
        affinity: (&["美食", "旅遊"], 0.03),
        visual_weight: 0.015,
        professional_weight: 0.02,
        follower_amplifier: 1.0,
    },
    BrandProfile {
        category: BrandCategory::Fashion,
        label: "服飾/配件",
        base_score: 0.70,
        keywords: &["時尚", "穿搭", "服飾", "配件"],
        affinity: (&["美妝", "生活"], 0.04),
        visual_weight: 0.03,
        professional_weight: 0.04,
        follower_amplifier: 1.2,
    },
    BrandProfile {
        category: BrandCategory::Tech,
        label: "3C/電商",
        base_score: 0.66,
        keywords: &["科技", "3C", "數位", "電商"],
        affinity: (&[], 0.0),
        visual_weight: 0.015,
        professional_weight: 0.04,
        follower_amplifier: 1.2,
    },
    BrandProfile {
        category: BrandCategory::Beauty,
        label: "彩妝/保養",
        base_score: 0.64,
        keywords: &["美妝", "彩妝", "保養", "美容"],
        affinity: (&["時尚", "生活"], 0.04),
        visual_weight: 0.03,
        professional_weight: 0.02,
        follower_amplifier: 1.0,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandScore {
    pub key: BrandCategory,
    pub label: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFitReport {
    pub scores: Vec<BrandScore>,
    pub suggested: Vec<String>,
    pub total_categories: usize,
    pub high_fit_categories: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PotentialLevel {
    High,
    Medium,
    Standard,
    Low,
}

impl PotentialLevel {
    pub fn description(self) -> &'static str {
        match self {
            PotentialLevel::High => "品牌合作潛力極高，適合多種類型品牌合作",
            PotentialLevel::Medium => "品牌合作潛力良好，有明確的合作方向",
            PotentialLevel::Standard => "品牌合作潛力標準，建議專注特定領域",
            PotentialLevel::Low => "品牌合作潛力較低，建議提升內容專業度",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandPotential {
    pub score: u32,
    pub level: PotentialLevel,
    pub description: String,
}

pub fn compute_brand_fit(signal: &ResolvedSignal) -> BrandFitReport {
    let mut scores: Vec<BrandScore> = CATALOG
        .iter()
        .map(|brand| BrandScore {
            key: brand.category,
            label: brand.label.to_string(),
            score: round_half_up(brand_score(brand, signal) * 100.0) as u32,
        })
        .collect();

    // sort_by is stable: ties keep catalog order
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    let high_fit_categories = scores
        .iter()
        .filter(|s| s.score >= HIGH_FIT_THRESHOLD)
        .count();

    let suggested = scores
        .iter()
        .filter(|s| s.score >= HIGH_FIT_THRESHOLD)
        .take(MAX_SUGGESTIONS)
        .map(|s| format!("適合：{}", s.label))
        .collect();

    BrandFitReport {
        total_categories: scores.len(),
        high_fit_categories,
        suggested,
        scores,
    }
}

/// Unrounded fit in [0.30, 0.98].
pub fn brand_score(brand: &BrandProfile, signal: &ResolvedSignal) -> f64 {
    let raw = brand.base_score
        + content_match(brand, &signal.topic)
        + visual_adjustment(brand, signal.overall)
        + professional_adjustment(brand, signal.professional_multiplier)
        + follower_adjustment(brand, signal.follower_multiplier);
    raw.clamp(SCORE_FLOOR, SCORE_CEIL)
}

pub fn content_match(brand: &BrandProfile, topic: &TopicText) -> f64 {
    let direct = topic.count_mentions(brand.keywords) as f64 * KEYWORD_BONUS;
    let (related, bonus) = brand.affinity;
    let cross = if topic.mentions_any(related) { bonus } else { 0.0 };
    (direct + cross).min(CONTENT_MATCH_CAP)
}

pub fn visual_adjustment(brand: &BrandProfile, overall: f64) -> f64 {
    ((overall - 7.0) * brand.visual_weight).clamp(-0.05, 0.08)
}

pub fn professional_adjustment(brand: &BrandProfile, professional_multiplier: f64) -> f64 {
    ((professional_multiplier - 1.0) * brand.professional_weight).clamp(-0.03, 0.06)
}

pub fn follower_adjustment(brand: &BrandProfile, follower_multiplier: f64) -> f64 {
    ((follower_multiplier - 1.0) * 0.02 * brand.follower_amplifier).clamp(-0.02, 0.04)
}

/// Overall partnership potential: mean category score plus 5 points per
/// high-fit category, bucketed into a level.
pub fn calculate_brand_potential(report: &BrandFitReport) -> BrandPotential {
    let avg = if report.scores.is_empty() {
        0.0
    } else {
        report.scores.iter().map(|s| s.score as f64).sum::<f64>() / report.scores.len() as f64
    };
    let potential = (avg + report.high_fit_categories as f64 * 5.0) / 100.0;

    let level = if potential >= 0.8 {
        PotentialLevel::High
    } else if potential >= 0.6 {
        PotentialLevel::Medium
    } else if potential < 0.4 {
        PotentialLevel::Low
    } else {
        PotentialLevel::Standard
    };

    BrandPotential {
        score: round_half_up(potential * 100.0).max(0.0) as u32,
        level,
        description: level.description().to_string(),
    }
}

/// One partnership sentence per high-fit category, in report order.
pub fn partnership_suggestions(report: &BrandFitReport) -> Vec<String> {
    report
        .scores
        .iter()
        .filter(|s| s.score >= HIGH_FIT_THRESHOLD)
        .map(|s| partnership_text(s.key).to_string())
        .collect()
}

fn partnership_text(category: BrandCategory) -> &'static str {
    match category {
        BrandCategory::Travel => "與旅宿/觀光品牌合作，適合推廣度假村、民宿、旅遊景點等",
        BrandCategory::Food => "與餐飲/食品品牌合作，適合推廣餐廳、特色小吃、食材等",
        BrandCategory::Lifestyle => "與生活家電/日用品品牌合作，適合推廣居家用品、家電等",
        BrandCategory::Fashion => "與服飾/配件品牌合作，適合推廣服裝、包包、飾品等",
        BrandCategory::Tech => "與3C/電商品牌合作，適合推廣數位產品、電子設備等",
        BrandCategory::Beauty => "與彩妝/保養品牌合作，適合推廣化妝品、護膚品等",
    }
}
