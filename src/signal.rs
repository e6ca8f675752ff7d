//! # Content Signal
//! Input bundle shared by every scorer, plus the single defaults table that
//! turns a sparse upstream payload into fully-populated numeric readings.
//!
//! - `ContentSignal` is the wire shape (all members optional).
//! - `SignalDefaults` enumerates `{field: default}` once.
//! - `ResolvedSignal` is what scorers read: already defaulted and coerced.
//!
//! A numeric reading that is absent, zero or non-finite falls back to its
//! default. Monetary values default to 0, so a missing price stays 0.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Unified input bundle consumed by all scorers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSignal {
    /// Free-text content category, e.g. "旅遊探店".
    #[serde(default, alias = "content_primary")]
    pub topic: String,
    /// Visual sub-scores, typically 0–10.
    #[serde(default)]
    pub visual: BTreeMap<String, f64>,
    /// Factors centered at 1.0.
    #[serde(default, alias = "mult")]
    pub multipliers: BTreeMap<String, f64>,
    #[serde(default)]
    pub analysis: BTreeMap<String, Value>,
    #[serde(default)]
    pub uniqueness: BTreeMap<String, String>,
    /// Monetary baselines per content format.
    #[serde(default)]
    pub value: BTreeMap<String, Value>,
}

impl ContentSignal {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_visual(mut self, key: &str, score: f64) -> Self {
        self.visual.insert(key.to_string(), score);
        self
    }

    pub fn with_multiplier(mut self, key: &str, factor: f64) -> Self {
        self.multipliers.insert(key.to_string(), factor);
        self
    }

    pub fn with_analysis(mut self, key: &str, v: impl Into<Value>) -> Self {
        self.analysis.insert(key.to_string(), v.into());
        self
    }

    pub fn with_uniqueness(mut self, key: &str, v: impl Into<String>) -> Self {
        self.uniqueness.insert(key.to_string(), v.into());
        self
    }

    pub fn with_value(mut self, key: &str, v: impl Into<Value>) -> Self {
        self.value.insert(key.to_string(), v.into());
        self
    }

    /// Apply `defaults` once; scorers only ever see the result.
    pub fn resolve(&self, defaults: &SignalDefaults) -> ResolvedSignal {
        let visual = |k: &str, d: f64| or_default(self.visual.get(k).copied(), d);
        let mult = |k: &str, d: f64| or_default(self.multipliers.get(k).copied(), d);
        let money = |k: &str| or_default(self.value.get(k).map(coerce_number), defaults.value);
        let label = |k: &str, d: &str| {
            self.analysis
                .get(k)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(d)
                .to_string()
        };

        ResolvedSignal {
            topic: TopicText::new(&self.topic),
            overall: visual("overall", defaults.overall),
            composition: visual("composition", defaults.composition),
            color_harmony: visual("color_harmony", defaults.color_harmony),
            editing: visual("editing", defaults.editing),
            professional_multiplier: mult("professional", defaults.professional_multiplier),
            follower_multiplier: mult("follower", defaults.follower_multiplier),
            professional_score: or_default(
                self.analysis.get("professional_score").map(coerce_number),
                defaults.professional_score,
            ),
            content_tone: label("content_tone", &defaults.content_tone),
            follower_quality: label("follower_quality", &defaults.follower_quality),
            style_signature: self
                .uniqueness
                .get("style_signature")
                .filter(|s| !s.is_empty())
                .cloned()
                .unwrap_or_else(|| defaults.style_signature.clone()),
            post_value: money("post_value"),
            story_value: money("story_value"),
            reels_value: money("reels_value"),
            monthly_package: money("monthly_package"),
        }
    }

    /// Resolve against the built-in defaults table.
    pub fn resolved(&self) -> ResolvedSignal {
        self.resolve(&SignalDefaults::default())
    }
}

/// Default for every field a scorer reads. Loaded from `[defaults]` in the
/// TOML config; missing keys keep the built-in value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalDefaults {
    pub overall: f64,
    pub composition: f64,
    pub color_harmony: f64,
    pub editing: f64,
    pub professional_multiplier: f64,
    pub follower_multiplier: f64,
    pub professional_score: f64,
    pub content_tone: String,
    pub follower_quality: String,
    pub style_signature: String,
    /// Shared by `post_value`, `story_value`, `reels_value`, `monthly_package`.
    pub value: f64,
}

impl Default for SignalDefaults {
    fn default() -> Self {
        Self {
            overall: 7.0,
            composition: 6.0,
            color_harmony: 6.0,
            editing: 6.0,
            professional_multiplier: 1.0,
            follower_multiplier: 1.0,
            professional_score: 6.0,
            content_tone: "neutral".to_string(),
            follower_quality: "standard".to_string(),
            style_signature: String::new(),
            value: 0.0,
        }
    }
}

impl SignalDefaults {
    /// Replace non-finite or negative numeric defaults with the built-in ones.
    /// Returns the names of the fields that were reset.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let builtin = Self::default();
        let mut reset = Vec::new();
        for (name, slot, fallback) in [
            ("overall", &mut self.overall, builtin.overall),
            ("composition", &mut self.composition, builtin.composition),
            ("color_harmony", &mut self.color_harmony, builtin.color_harmony),
            ("editing", &mut self.editing, builtin.editing),
            (
                "professional_multiplier",
                &mut self.professional_multiplier,
                builtin.professional_multiplier,
            ),
            (
                "follower_multiplier",
                &mut self.follower_multiplier,
                builtin.follower_multiplier,
            ),
            (
                "professional_score",
                &mut self.professional_score,
                builtin.professional_score,
            ),
            ("value", &mut self.value, builtin.value),
        ] {
            if !slot.is_finite() || *slot < 0.0 {
                *slot = fallback;
                reset.push(name);
            }
        }
        reset
    }
}

/// Fully-defaulted view of a `ContentSignal`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSignal {
    pub topic: TopicText,
    pub overall: f64,
    pub composition: f64,
    pub color_harmony: f64,
    pub editing: f64,
    pub professional_multiplier: f64,
    pub follower_multiplier: f64,
    pub professional_score: f64,
    pub content_tone: String,
    pub follower_quality: String,
    pub style_signature: String,
    pub post_value: f64,
    pub story_value: f64,
    pub reels_value: f64,
    pub monthly_package: f64,
}

impl ResolvedSignal {
    pub fn tone_is(&self, candidates: &[&str]) -> bool {
        candidates
            .iter()
            .any(|c| self.content_tone.eq_ignore_ascii_case(c))
    }

    pub fn follower_quality_is(&self, candidates: &[&str]) -> bool {
        candidates
            .iter()
            .any(|c| self.follower_quality.eq_ignore_ascii_case(c))
    }
}

/// Topic text normalized for keyword matching: Unicode lowercase with
/// whitespace runs collapsed to one space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicText(String);

impl TopicText {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive substring match against a single keyword.
    pub fn mentions(&self, keyword: &str) -> bool {
        let k = normalize(keyword);
        !k.is_empty() && self.0.contains(k.as_str())
    }

    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.mentions(k))
    }

    /// Number of keywords from the table that appear in the topic.
    pub fn count_mentions(&self, keywords: &[&str]) -> usize {
        keywords.iter().filter(|k| self.mentions(k)).count()
    }
}

fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numeric coercion for loosely-typed upstream values.
/// Unparsable input and non-finite results become 0.
pub fn coerce_number(v: &Value) -> f64 {
    let n = match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn or_default(reading: Option<f64>, default: f64) -> f64 {
    match reading {
        Some(x) if x.is_finite() && x != 0.0 => x,
        _ => default,
    }
}

/// Short anonymized id for logs (first 6 bytes of SHA-256, hex).
pub fn fingerprint(text: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
