//! # Monetary Baseline
//! Per-format price baselines from follower counts and upstream analysis
//! scores. The result feeds the `value` and `multipliers` members of a
//! `ContentSignal`.
//!
//! post = base price × visual × content × professional × follower × unique,
//! truncated; story/reels/monthly are fixed fractions/multiples of post.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::signal::ContentSignal;

/// Follower-count tiers: (min followers, base price, tier label).
const FOLLOWER_TIERS: &[(u64, f64, &str)] = &[
    (100_000, 80_000.0, "名人級"),
    (50_000, 35_000.0, "網紅級"),
    (10_000, 12_000.0, "意見領袖"),
    (5_000, 3_500.0, "微網紅"),
    (1_000, 1_200.0, "潛力股"),
    (500, 600.0, "新星"),
];
const ENTRY_TIER: (f64, &str) = (200.0, "素人");
const NEUTRAL_ANALYSIS_SCORE: f64 = 5.0;

/// Primary content type → content multiplier. Unknown types are neutral.
const CONTENT_TYPE_MULTIPLIERS: &[(&str, f64)] = &[
    ("美妝時尚", 2.5),
    ("旅遊探店", 2.0),
    ("美食料理", 1.8),
    ("健身運動", 1.8),
    ("科技3C", 1.6),
    ("親子家庭", 1.7),
    ("攝影藝術", 1.5),
    ("寵物萌寵", 1.5),
    ("知識教育", 1.4),
    ("生活風格", 1.2),
    ("生活日常", 1.0),
    ("個人隨拍", 0.8),
];

/// Upstream profile facts needed to price a creator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatorProfile {
    pub followers: u64,
    pub following: u64,
    pub visual_overall: Option<f64>,
    pub content_primary: String,
    pub has_business_tag: bool,
    pub has_contact: bool,
    pub has_link: bool,
    pub consistency_score: Option<f64>,
    pub brand_identity: Option<f64>,
    pub creativity_score: Option<f64>,
    pub differentiation: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowerQuality {
    Influencer,
    High,
    Standard,
    Growing,
    Emerging,
}

impl FollowerQuality {
    /// Quality from the followers/following ratio. No following → standard.
    pub fn from_counts(followers: u64, following: u64) -> Self {
        if following == 0 {
            return FollowerQuality::Standard;
        }
        let ratio = followers as f64 / following as f64;
        if ratio >= 3.0 {
            FollowerQuality::Influencer
        } else if ratio >= 1.5 {
            FollowerQuality::High
        } else if ratio >= 1.0 {
            FollowerQuality::Standard
        } else if ratio >= 0.5 {
            FollowerQuality::Growing
        } else {
            FollowerQuality::Emerging
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            FollowerQuality::Influencer => 1.5,
            FollowerQuality::High => 1.2,
            FollowerQuality::Standard => 1.0,
            FollowerQuality::Growing => 0.8,
            FollowerQuality::Emerging => 0.6,
        }
    }

    /// Code read back by the scorers through `analysis.follower_quality`.
    pub fn code(self) -> &'static str {
        match self {
            FollowerQuality::Influencer => "influencer",
            FollowerQuality::High => "high",
            FollowerQuality::Standard => "standard",
            FollowerQuality::Growing => "growing",
            FollowerQuality::Emerging => "emerging",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FollowerQuality::Influencer => "高影響力",
            FollowerQuality::High => "有吸引力",
            FollowerQuality::Standard => "標準",
            FollowerQuality::Growing => "需成長",
            FollowerQuality::Emerging => "待建立",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueMultipliers {
    pub visual: f64,
    pub content: f64,
    pub professional: f64,
    pub follower: f64,
    pub unique: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEstimate {
    pub base_price: f64,
    pub follower_tier: String,
    pub follower_quality: FollowerQuality,
    pub follower_quality_label: String,
    /// Visual score the estimate was priced from, if the profile had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_overall: Option<f64>,
    /// Rounded to 2 decimals for display.
    pub multipliers: ValueMultipliers,
    pub post_value: u64,
    pub story_value: u64,
    pub reels_value: u64,
    pub monthly_package: u64,
}

impl ValueEstimate {
    /// Build the scorer input carrying this estimate's multipliers and values.
    pub fn to_signal(&self, topic: impl Into<String>) -> ContentSignal {
        let signal = ContentSignal::new(topic);
        let signal = match self.visual_overall {
            Some(overall) => signal.with_visual("overall", overall),
            None => signal,
        };
        signal
            .with_multiplier("professional", self.multipliers.professional)
            .with_multiplier("follower", self.multipliers.follower)
            .with_analysis("follower_quality", self.follower_quality.code())
            .with_value("post_value", json!(self.post_value))
            .with_value("story_value", json!(self.story_value))
            .with_value("reels_value", json!(self.reels_value))
            .with_value("monthly_package", json!(self.monthly_package))
    }
}

pub fn base_price(followers: u64) -> f64 {
    follower_tier(followers).0
}

pub fn follower_tier(followers: u64) -> (f64, &'static str) {
    FOLLOWER_TIERS
        .iter()
        .find(|(min, _, _)| followers >= *min)
        .map(|&(_, price, label)| (price, label))
        .unwrap_or(ENTRY_TIER)
}

pub fn visual_multiplier(overall: f64) -> f64 {
    if overall >= 9.0 {
        2.0
    } else if overall >= 7.5 {
        1.5
    } else if overall >= 6.0 {
        1.2
    } else if overall >= 4.0 {
        1.0
    } else {
        0.7
    }
}

pub fn content_multiplier(primary: &str) -> f64 {
    let primary = primary.trim();
    CONTENT_TYPE_MULTIPLIERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(primary))
        .map(|&(_, m)| m)
        .unwrap_or(1.0)
}

/// 0.9 ..= 1.9 from bio flags, posting consistency and brand identity.
pub fn professional_multiplier(profile: &CreatorProfile) -> f64 {
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    let score = flag(profile.has_business_tag) * 0.2
        + flag(profile.has_contact) * 0.15
        + flag(profile.has_link) * 0.15
        + analysis_score(profile.consistency_score) / 10.0 * 0.25
        + analysis_score(profile.brand_identity) / 10.0 * 0.25;
    0.9 + score
}

/// Upstream 0-10 score; missing or non-finite reads as 5, the rest is clamped.
pub fn analysis_score(score: Option<f64>) -> f64 {
    score
        .filter(|s| s.is_finite())
        .unwrap_or(NEUTRAL_ANALYSIS_SCORE)
        .clamp(0.0, 10.0)
}

pub fn uniqueness_multiplier(creativity: f64, differentiation: f64) -> f64 {
    let avg = (creativity + differentiation) / 2.0;
    if avg >= 8.5 {
        1.6
    } else if avg >= 7.0 {
        1.3
    } else {
        1.0
    }
}

pub fn estimate_value(profile: &CreatorProfile) -> ValueEstimate {
    let (base, tier) = follower_tier(profile.followers);
    let quality = FollowerQuality::from_counts(profile.followers, profile.following);

    let visual = visual_multiplier(analysis_score(profile.visual_overall));
    let content = content_multiplier(&profile.content_primary);
    let professional = professional_multiplier(profile);
    let follower = quality.multiplier();
    let unique = uniqueness_multiplier(
        analysis_score(profile.creativity_score),
        analysis_score(profile.differentiation),
    );

    let post = truncate(base * visual * content * professional * follower * unique);

    ValueEstimate {
        base_price: base,
        follower_tier: tier.to_string(),
        follower_quality: quality,
        follower_quality_label: quality.label().to_string(),
        visual_overall: profile.visual_overall.filter(|v| v.is_finite()),
        multipliers: ValueMultipliers {
            visual: round2(visual),
            content: round2(content),
            professional: round2(professional),
            follower: round2(follower),
            unique: round2(unique),
        },
        post_value: post,
        story_value: truncate(post as f64 * 0.4),
        reels_value: truncate(post as f64 * 1.3),
        monthly_package: post.saturating_mul(4),
    }
}

fn truncate(x: f64) -> u64 {
    if x.is_finite() && x > 0.0 {
        x.trunc() as u64
    } else {
        0
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_follower_count() {
        assert_eq!(follower_tier(150_000), (80_000.0, "名人級"));
        assert_eq!(follower_tier(10_000), (12_000.0, "意見領袖"));
        assert_eq!(follower_tier(499), (200.0, "素人"));
        assert_eq!(base_price(0), 200.0);
    }

    #[test]
    fn follower_quality_from_ratio() {
        assert_eq!(FollowerQuality::from_counts(9_000, 0), FollowerQuality::Standard);
        assert_eq!(FollowerQuality::from_counts(3_000, 1_000), FollowerQuality::Influencer);
        assert_eq!(FollowerQuality::from_counts(1_500, 1_000), FollowerQuality::High);
        assert_eq!(FollowerQuality::from_counts(600, 1_000), FollowerQuality::Growing);
        assert_eq!(FollowerQuality::from_counts(100, 1_000), FollowerQuality::Emerging);
    }

    #[test]
    fn professional_multiplier_range() {
        let none = CreatorProfile {
            consistency_score: Some(0.0),
            brand_identity: Some(0.0),
            ..CreatorProfile::default()
        };
        assert!((professional_multiplier(&none) - 0.9).abs() < 1e-12);

        let full = CreatorProfile {
            has_business_tag: true,
            has_contact: true,
            has_link: true,
            consistency_score: Some(10.0),
            brand_identity: Some(10.0),
            ..CreatorProfile::default()
        };
        assert!((professional_multiplier(&full) - 1.9).abs() < 1e-12);
    }

    #[test]
    fn estimate_for_mid_tier_food_creator() {
        let profile = CreatorProfile {
            followers: 12_000,
            following: 1_000,
            visual_overall: Some(6.5),
            content_primary: "美食料理".into(),
            has_business_tag: true,
            consistency_score: Some(6.0),
            brand_identity: Some(6.0),
            creativity_score: Some(7.0),
            differentiation: Some(7.0),
            ..CreatorProfile::default()
        };
        let v = estimate_value(&profile);
        // 12000 × 1.2 × 1.8 × 1.4 × 1.5 × 1.3 = 70761.6
        assert_eq!(v.post_value, 70_761);
        assert_eq!(v.story_value, 28_304);
        assert_eq!(v.reels_value, 91_989);
        assert_eq!(v.monthly_package, 283_044);
        assert_eq!(v.follower_tier, "意見領袖");
        assert_eq!(v.follower_quality, FollowerQuality::Influencer);
        assert_eq!(v.multipliers.professional, 1.4);
    }

    #[test]
    fn extreme_analysis_scores_are_clamped() {
        let wild = CreatorProfile {
            followers: 200_000,
            visual_overall: Some(1e300),
            consistency_score: Some(1e300),
            brand_identity: Some(-1e300),
            creativity_score: Some(1e300),
            differentiation: Some(1e300),
            ..CreatorProfile::default()
        };
        let v = estimate_value(&wild);
        // consistency clamps to 10, brand identity to 0: 0.9 + 0.25
        assert_eq!(v.multipliers.professional, 1.15);
        assert_eq!(v.multipliers.visual, 2.0);
        assert_eq!(v.multipliers.unique, 1.6);
        assert_eq!(v.monthly_package, v.post_value * 4);

        assert_eq!(analysis_score(None), 5.0);
        assert_eq!(analysis_score(Some(f64::NAN)), 5.0);
        assert_eq!(analysis_score(Some(42.0)), 10.0);
    }

    #[test]
    fn truncate_saturates_and_zeroes_garbage() {
        assert_eq!(truncate(f64::MAX), u64::MAX);
        assert_eq!(truncate(f64::NAN), 0);
        assert_eq!(truncate(-3.7), 0);
        assert_eq!(truncate(12.9), 12);
    }

    #[test]
    fn unknown_content_type_is_neutral() {
        assert_eq!(content_multiplier("手作"), 1.0);
        assert_eq!(content_multiplier(" 科技3c "), 1.6);
    }

    #[test]
    fn estimate_round_trips_into_a_signal() {
        let v = estimate_value(&CreatorProfile {
            followers: 60_000,
            following: 10_000,
            ..CreatorProfile::default()
        });
        let r = v.to_signal("旅遊").resolved();
        assert_eq!(r.overall, 7.0);
        assert_eq!(r.post_value, v.post_value as f64);
        assert_eq!(r.follower_multiplier, 1.5);
        assert_eq!(r.follower_quality, "influencer");
    }

    #[test]
    fn signal_carries_the_profile_visual_score() {
        let v = estimate_value(&CreatorProfile {
            followers: 8_000,
            visual_overall: Some(8.6),
            ..CreatorProfile::default()
        });
        assert_eq!(v.visual_overall, Some(8.6));
        assert_eq!(v.to_signal("美食").resolved().overall, 8.6);
    }
}
