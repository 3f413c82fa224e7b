//! Rule-based content quality scoring
//!
//! A (title, description, keyword) triple starts at 100 points. Each failed
//! [`QualityCheck`] subtracts its weight and contributes one suggestion, in
//! check order. A score of 70 or more passes.

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;

use crate::contracts::ContentQualityScore;
use crate::meta::lexicon::mentions_any;
use crate::meta::Lexicon;

/// Passing threshold
pub const PASSING_SCORE: u32 = 70;

const MAX_SCORE: u32 = 100;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// One scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityCheck {
    KeywordInTitle,
    BenefitWords,
    Numbers,
    CurrentYear,
    CallToAction,
    PowerWords,
    EmotionalWords,
    UrgencyWords,
    ValueProposition,
}

impl QualityCheck {
    /// All checks in evaluation order
    pub const ALL: [QualityCheck; 9] = [
        QualityCheck::KeywordInTitle,
        QualityCheck::BenefitWords,
        QualityCheck::Numbers,
        QualityCheck::CurrentYear,
        QualityCheck::CallToAction,
        QualityCheck::PowerWords,
        QualityCheck::EmotionalWords,
        QualityCheck::UrgencyWords,
        QualityCheck::ValueProposition,
    ];

    /// Points subtracted when the check fails
    pub fn weight(&self) -> u32 {
        match self {
            QualityCheck::KeywordInTitle => 20,
            QualityCheck::BenefitWords => 15,
            QualityCheck::CurrentYear => 5,
            QualityCheck::Numbers
            | QualityCheck::CallToAction
            | QualityCheck::PowerWords
            | QualityCheck::EmotionalWords
            | QualityCheck::UrgencyWords
            | QualityCheck::ValueProposition => 10,
        }
    }

    fn suggestion(&self, keyword: &str, year: i32) -> String {
        match self {
            QualityCheck::KeywordInTitle => {
                format!("Include target keyword \"{}\" in title", keyword)
            }
            QualityCheck::BenefitWords => {
                "Add benefit-driven words (stop, eliminate, instant, free, etc.)".to_string()
            }
            QualityCheck::Numbers => {
                "Add numbers for credibility (e.g., \"99% effective\", \"10,000+ customers\")".to_string()
            }
            QualityCheck::CurrentYear => {
                format!("Add current year ({}) for freshness signal", year)
            }
            QualityCheck::CallToAction => {
                "Add call-to-action to description (try, get, shop, learn, etc.)".to_string()
            }
            QualityCheck::PowerWords => {
                "Consider adding power words (best, ultimate, complete, perfect, etc.)".to_string()
            }
            QualityCheck::EmotionalWords => {
                "Consider adding emotional appeal words to connect with readers".to_string()
            }
            QualityCheck::UrgencyWords => {
                "Consider adding urgency words (now, today, limited, fast, instant)".to_string()
            }
            QualityCheck::ValueProposition => {
                "Highlight unique value proposition (only, unique, exclusive, etc.)".to_string()
            }
        }
    }
}

static DEFAULT_SCORER: Lazy<QualityScorer> = Lazy::new(QualityScorer::default);

/// Content quality scorer
#[derive(Clone)]
pub struct QualityScorer {
    lexicon: Lexicon,
    clock: Arc<dyn Clock>,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new(Lexicon::default(), Arc::new(SystemClock))
    }
}

impl QualityScorer {
    pub fn new(lexicon: Lexicon, clock: Arc<dyn Clock>) -> Self {
        Self { lexicon, clock }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Score a title and description
    pub fn score_content(
        &self,
        title: &str,
        description: &str,
        target_keyword: Option<&str>,
    ) -> ContentQualityScore {
        let keyword = target_keyword.map(str::trim).filter(|k| !k.is_empty());
        let year = self.clock.now().year();
        let both = [title, description];

        let mut score = MAX_SCORE;
        let mut suggestions = Vec::new();

        for check in QualityCheck::ALL {
            let passed = match check {
                QualityCheck::KeywordInTitle => match keyword {
                    Some(kw) => title.to_lowercase().contains(&kw.to_lowercase()),
                    None => continue,
                },
                QualityCheck::BenefitWords => mentions_any(&both, &self.lexicon.scoring_benefit),
                QualityCheck::Numbers => both.iter().any(|t| t.chars().any(|c| c.is_ascii_digit())),
                QualityCheck::CurrentYear => both.iter().any(|t| has_year_token(t, year)),
                QualityCheck::CallToAction => mentions_any(&[description], &self.lexicon.cta_verbs),
                QualityCheck::PowerWords => mentions_any(&both, &self.lexicon.power),
                QualityCheck::EmotionalWords => mentions_any(&both, &self.lexicon.emotional),
                QualityCheck::UrgencyWords => mentions_any(&both, &self.lexicon.urgency),
                QualityCheck::ValueProposition => mentions_any(&both, &self.lexicon.uvp),
            };

            if !passed {
                score = score.saturating_sub(check.weight());
                suggestions.push(check.suggestion(keyword.unwrap_or_default(), year));
            }
        }

        debug!(score, failed = suggestions.len(), "Scored content");

        ContentQualityScore {
            is_valid: score >= PASSING_SCORE,
            score,
            suggestions,
        }
    }
}

/// Score with the default lexicon and the system clock
pub fn score_content(
    title: &str,
    description: &str,
    target_keyword: Option<&str>,
) -> ContentQualityScore {
    DEFAULT_SCORER.score_content(title, description, target_keyword)
}

fn has_year_token(text: &str, year: i32) -> bool {
    let year = year.to_string();
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scorer_in(year: i32) -> QualityScorer {
        let instant = Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap();
        QualityScorer::default().with_clock(Arc::new(FixedClock(instant)))
    }

    #[test]
    fn test_weights_sum_to_100() {
        let total: u32 = QualityCheck::ALL.iter().map(QualityCheck::weight).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_perfect_score() {
        let scorer = scorer_in(2026);
        let result = scorer.score_content(
            "Best Cat Litter Deodorizer 2026: Stop Odors Now",
            "Love a fresh home? The only unique carbon formula that works. Shop today.",
            Some("cat litter"),
        );
        assert_eq!(result.score, 100);
        assert!(result.is_valid);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_empty_content_scores_zero() {
        let result = scorer_in(2026).score_content("", "", Some("litter"));
        assert_eq!(result.score, 0);
        assert!(!result.is_valid);
        assert_eq!(result.suggestions.len(), 9);
        assert_eq!(result.suggestions[0], "Include target keyword \"litter\" in title");
        assert_eq!(result.suggestions[3], "Add current year (2026) for freshness signal");
    }

    #[test]
    fn test_keyword_check_skipped_without_keyword() {
        let result = scorer_in(2026).score_content("", "", None);
        assert_eq!(result.score, 20);
        assert_eq!(result.suggestions.len(), 8);
        assert!(result.suggestions[0].starts_with("Add benefit-driven words"));
    }

    #[test]
    fn test_learn_is_not_a_scoring_benefit_word() {
        let result = scorer_in(2026).score_content("Cat guide", "Learn about odor", None);
        assert_eq!(result.score, 30);
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.starts_with("Add benefit-driven words")));
    }

    #[test]
    fn test_year_must_be_a_token() {
        assert!(has_year_token("Best of 2026!", 2026));
        assert!(has_year_token("(2026)", 2026));
        assert!(!has_year_token("Order 120265", 2026));
        assert!(!has_year_token("Best of 2025", 2026));
    }

    #[test]
    fn test_cta_only_checked_in_description() {
        let scorer = scorer_in(2026);
        let result = scorer.score_content("Shop here", "Nothing to do", None);
        assert!(result
            .suggestions
            .contains(&"Add call-to-action to description (try, get, shop, learn, etc.)".to_string()));
    }
}
