//! Travel-accommodation affinity for three archetypes: city hotel, resort
//! and design hotel. Scores are integers capped at 96.

use serde::{Deserialize, Serialize};

use crate::score::round_half_up;
use crate::signal::ResolvedSignal;

const ARCHETYPE_BASE: f64 = 0.65;
const ARCHETYPE_CAP: i64 = 96;
const STYLE_LENGTH_CAP: f64 = 0.10;

const HIGH_FOLLOWER_QUALITY: &[&str] = &["high", "influencer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelSplit {
    pub city_hotel: u32,
    pub resort: u32,
    pub design_hotel: u32,
}

/// Topic boosts per archetype; first matching row wins.
type TopicBoosts = &'static [(&'static [&'static str], f64)];

const CITY_HOTEL_TOPICS: TopicBoosts = &[
    (&["旅遊"], 0.15),
    (&["商務", "工作"], 0.20),
    (&["美食"], 0.08),
];

const RESORT_TOPICS: TopicBoosts = &[
    (&["旅遊"], 0.15),
    (&["休閒", "度假"], 0.20),
    (&["自然", "戶外"], 0.12),
];

const DESIGN_HOTEL_TOPICS: TopicBoosts = &[
    (&["藝術", "設計"], 0.20),
    (&["文創", "創意"], 0.15),
    (&["旅遊"], 0.10),
];

pub fn synthesize_travel_split(signal: &ResolvedSignal) -> TravelSplit {
    TravelSplit {
        city_hotel: to_archetype_score(city_hotel_affinity(signal)),
        resort: to_archetype_score(resort_affinity(signal)),
        design_hotel: to_archetype_score(design_hotel_affinity(signal)),
    }
}

pub fn city_hotel_affinity(signal: &ResolvedSignal) -> f64 {
    let mut score = ARCHETYPE_BASE + topic_boost(signal, CITY_HOTEL_TOPICS);
    score += (signal.composition - 6.0) * 0.02;
    score += (signal.overall - 7.0) * 0.015;
    if signal.professional_score > 7.0 {
        score += 0.10;
    }
    if signal.follower_quality_is(HIGH_FOLLOWER_QUALITY) {
        score += 0.05;
    }
    score
}

pub fn resort_affinity(signal: &ResolvedSignal) -> f64 {
    let mut score = ARCHETYPE_BASE + topic_boost(signal, RESORT_TOPICS);
    score += (signal.color_harmony - 6.0) * 0.025;
    score += (signal.overall - 7.0) * 0.02;
    if signal.style_signature.contains("自然") || signal.style_signature.contains("清新") {
        score += 0.08;
    }
    if signal.tone_is(&["relaxed", "leisure"]) {
        score += 0.06;
    }
    score
}

pub fn design_hotel_affinity(signal: &ResolvedSignal) -> f64 {
    let mut score = ARCHETYPE_BASE + topic_boost(signal, DESIGN_HOTEL_TOPICS);
    let style_len = signal.style_signature.chars().count() as f64;
    score += (style_len / 500.0).min(STYLE_LENGTH_CAP);
    score += (signal.editing - 6.0) * 0.02;
    score += (signal.overall - 7.0) * 0.015;
    if signal.tone_is(&["creative", "artistic"]) {
        score += 0.08;
    }
    if signal.follower_quality_is(HIGH_FOLLOWER_QUALITY) {
        score += 0.05;
    }
    score
}

/// Single [0, 1] travel-affinity scalar, independent of the archetypes.
pub fn calculate_overall_travel_score(signal: &ResolvedSignal) -> f64 {
    let mut score = 0.5;
    if signal.topic.mentions("旅遊") {
        score += 0.3;
    } else if signal.topic.mentions_any(&["美食", "生活"]) {
        score += 0.1;
    }
    score += (signal.overall - 7.0) * 0.05;
    score += (signal.professional_score - 6.0) * 0.03;
    score.clamp(0.0, 1.0)
}

fn topic_boost(signal: &ResolvedSignal, table: TopicBoosts) -> f64 {
    table
        .iter()
        .find(|(keywords, _)| signal.topic.mentions_any(keywords))
        .map(|&(_, boost)| boost)
        .unwrap_or(0.0)
}

/// ×100, rounded, then held inside [0, 96].
fn to_archetype_score(affinity: f64) -> u32 {
    let rounded = round_half_up(affinity * 100.0);
    if !rounded.is_finite() {
        return 0;
    }
    (rounded as i64).clamp(0, ARCHETYPE_CAP) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::ContentSignal;

    #[test]
    fn neutral_signal_sits_at_base() {
        let s = synthesize_travel_split(&ContentSignal::default().resolved());
        assert_eq!(
            s,
            TravelSplit {
                city_hotel: 65,
                resort: 65,
                design_hotel: 65
            }
        );
    }

    #[test]
    fn travel_topic_boosts_every_archetype() {
        let r = ContentSignal::new("旅遊探店").resolved();
        let s = synthesize_travel_split(&r);
        assert_eq!(s.city_hotel, 80);
        assert_eq!(s.resort, 80);
        assert_eq!(s.design_hotel, 75);
    }

    #[test]
    fn visual_sub_scores_feed_their_archetype() {
        let r = ContentSignal::default()
            .with_visual("composition", 10.0)
            .with_visual("color_harmony", 10.0)
            .with_visual("editing", 10.0)
            .resolved();
        let s = synthesize_travel_split(&r);
        assert_eq!(s.city_hotel, 73);
        assert_eq!(s.resort, 75);
        assert_eq!(s.design_hotel, 73);
    }

    #[test]
    fn style_signature_length_is_capped() {
        let long = "極".repeat(400);
        let r = ContentSignal::default()
            .with_uniqueness("style_signature", long)
            .resolved();
        assert!((design_hotel_affinity(&r) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn tone_and_follower_quality_bonuses() {
        let r = ContentSignal::default()
            .with_analysis("content_tone", "Relaxed")
            .with_analysis("follower_quality", "influencer")
            .with_uniqueness("style_signature", "自然清新")
            .resolved();
        let s = synthesize_travel_split(&r);
        assert_eq!(s.city_hotel, 70);
        assert_eq!(s.resort, 79);
        // 0.65 + 4/500 + 0.05
        assert_eq!(s.design_hotel, 71);
    }

    #[test]
    fn scores_are_capped_and_floored() {
        let hot = ContentSignal::new("商務 藝術 度假")
            .with_visual("overall", 10.0)
            .with_visual("composition", 10.0)
            .with_visual("color_harmony", 10.0)
            .with_visual("editing", 10.0)
            .with_analysis("professional_score", 9)
            .resolved();
        let s = synthesize_travel_split(&hot);
        assert_eq!((s.city_hotel, s.resort, s.design_hotel), (96, 96, 96));

        let cold = ContentSignal::default()
            .with_visual("overall", -60.0)
            .resolved();
        let s = synthesize_travel_split(&cold);
        assert_eq!((s.city_hotel, s.resort, s.design_hotel), (0, 0, 0));
    }

    #[test]
    fn overall_travel_score_is_bounded() {
        let neutral = calculate_overall_travel_score(&ContentSignal::default().resolved());
        assert!((neutral - 0.5).abs() < 1e-12);

        let travel = ContentSignal::new("旅遊")
            .with_visual("overall", 10.0)
            .with_analysis("professional_score", 8)
            .resolved();
        assert_eq!(calculate_overall_travel_score(&travel), 1.0);

        let food = ContentSignal::new("美食").resolved();
        assert!((calculate_overall_travel_score(&food) - 0.6).abs() < 1e-12);
    }
}
