//! Fixed vocabularies used by the description optimizer and the scorer
//!
//! The constant tables are the shipped defaults. [`Lexicon`] carries owned
//! copies so a site can override any single table from its configuration
//! without touching the scoring or optimization control flow.
//!
//! Matching is case-insensitive substring matching: `"now"` matches
//! `"Shop NOW"` and also `"know"`.

use serde::{Deserialize, Serialize};

/// Words signalling a concrete benefit to the reader
pub const BENEFIT_WORDS: &[&str] = &[
    "stop",
    "eliminate",
    "instant",
    "free",
    "proven",
    "guaranteed",
    "save",
    "get",
    "discover",
    "learn",
];

/// Benefit words counted by the quality scorer
///
/// Same as [`BENEFIT_WORDS`] without `learn`.
pub const SCORING_BENEFIT_WORDS: &[&str] = &[
    "stop",
    "eliminate",
    "instant",
    "free",
    "proven",
    "guaranteed",
    "save",
    "get",
    "discover",
];

/// Verbs that make a description read as a call to action
pub const CTA_VERBS: &[&str] = &[
    "try", "get", "shop", "buy", "learn", "discover", "see", "start", "find",
];

pub const POWER_WORDS: &[&str] = &[
    "best",
    "ultimate",
    "complete",
    "perfect",
    "essential",
    "amazing",
    "incredible",
];

pub const EMOTIONAL_WORDS: &[&str] = &[
    "love",
    "hate",
    "fear",
    "worry",
    "embarrassed",
    "happy",
    "amazed",
    "shocked",
];

pub const URGENCY_WORDS: &[&str] = &[
    "now", "today", "limited", "only", "hurry", "fast", "quick", "instant",
];

/// Unique-value-proposition words
pub const UVP_WORDS: &[&str] = &["only", "unique", "exclusive", "special", "different", "unlike"];

/// Call-to-action phrases appended to short descriptions, tried in order
pub const CTA_PHRASES: &[&str] = &[
    "Shop now.",
    "Try it free.",
    "Learn more.",
    "Get started.",
    "See results.",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Overridable set of vocabularies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub benefit: Vec<String>,
    pub scoring_benefit: Vec<String>,
    pub cta_verbs: Vec<String>,
    pub power: Vec<String>,
    pub emotional: Vec<String>,
    pub urgency: Vec<String>,
    pub uvp: Vec<String>,
    pub cta_phrases: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            benefit: owned(BENEFIT_WORDS),
            scoring_benefit: owned(SCORING_BENEFIT_WORDS),
            cta_verbs: owned(CTA_VERBS),
            power: owned(POWER_WORDS),
            emotional: owned(EMOTIONAL_WORDS),
            urgency: owned(URGENCY_WORDS),
            uvp: owned(UVP_WORDS),
            cta_phrases: owned(CTA_PHRASES),
        }
    }
}

/// Check whether any of `texts` contains any of `words`, ignoring case
pub fn mentions_any(texts: &[&str], words: &[String]) -> bool {
    texts.iter().any(|text| {
        let lower = text.to_lowercase();
        words
            .iter()
            .filter(|w| !w.is_empty())
            .any(|w| lower.contains(&w.to_lowercase()))
    })
}
