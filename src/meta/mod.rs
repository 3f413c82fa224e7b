//! Meta title and description optimization
//!
//! Both optimizers run a fixed sequence of steps over a trimmed input string.
//! Each step may rewrite the text and may append one warning, so the warning
//! list doubles as a log of what was changed and in which order. The final
//! text always goes through a [`MetaNormalizer`] owned by the site.
//!
//! Lengths are counted in characters, never bytes.

pub mod description;
pub mod lexicon;
pub mod normalize;
pub mod title;

pub use lexicon::Lexicon;
pub use normalize::{MetaNormalizer, SiteNormalizer};

use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::contracts::{OptimizedDescription, OptimizedTitle};

/// Upper bound of the title display window
pub const META_TITLE_MAX_LENGTH: usize = 60;
/// Lower bound of the title display window
pub const META_TITLE_MIN_LENGTH: usize = 40;
/// Upper bound of the description display window
pub const META_DESCRIPTION_MAX_LENGTH: usize = 155;
/// Lower bound of the description display window
pub const META_DESCRIPTION_MIN_LENGTH: usize = 140;

/// Brand name used when no configuration overrides it
pub const DEFAULT_BRAND: &str = "Purrify";

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];
const ELLIPSIS: char = '…';

static DEFAULT_OPTIMIZER: Lazy<MetaOptimizer> = Lazy::new(MetaOptimizer::default);

/// Title and description optimizer
///
/// Holds the brand suffix stripped from over-long titles, the vocabulary
/// used for benefit detection and CTA candidates, and the final
/// normalization collaborator.
#[derive(Clone)]
pub struct MetaOptimizer {
    brand_suffix: String,
    lexicon: Lexicon,
    normalizer: Arc<dyn MetaNormalizer>,
}

impl Default for MetaOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_BRAND)
    }
}

impl std::fmt::Debug for MetaOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaOptimizer")
            .field("brand_suffix", &self.brand_suffix)
            .field("lexicon", &self.lexicon)
            .finish_non_exhaustive()
    }
}

impl MetaOptimizer {
    /// Create an optimizer for the given brand with the default site normalizer
    pub fn new(brand: &str) -> Self {
        Self {
            brand_suffix: format!(" | {}", brand),
            lexicon: Lexicon::default(),
            normalizer: Arc::new(SiteNormalizer::for_brand(brand)),
        }
    }

    /// Replace the vocabulary
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Replace the final normalization collaborator
    pub fn with_normalizer(mut self, normalizer: Arc<dyn MetaNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Branding suffix, e.g. `" | Purrify"`
    pub fn brand_suffix(&self) -> &str {
        &self.brand_suffix
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

/// Optimize a title with the default brand configuration
pub fn optimize_title(title: &str, target_keyword: Option<&str>) -> OptimizedTitle {
    DEFAULT_OPTIMIZER.optimize_title(title, target_keyword)
}

/// Optimize a description with the default brand configuration
pub fn optimize_description(
    description: &str,
    target_keyword: Option<&str>,
) -> OptimizedDescription {
    DEFAULT_OPTIMIZER.optimize_description(description, target_keyword)
}

/// Length in characters
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether a title of this length sits in the 40–60 window
pub fn is_optimal_title_length(length: usize) -> bool {
    (META_TITLE_MIN_LENGTH..=META_TITLE_MAX_LENGTH).contains(&length)
}

/// Whether a description of this length sits in the 140–155 window
pub fn is_optimal_description_length(length: usize) -> bool {
    (META_DESCRIPTION_MIN_LENGTH..=META_DESCRIPTION_MAX_LENGTH).contains(&length)
}

/// Keep the first `keep` characters and mark the cut with an ellipsis,
/// unless the kept text already ends a sentence.
pub(crate) fn truncate_at_sentence(text: &str, keep: usize) -> String {
    let kept: String = text.chars().take(keep).collect();
    let mut kept = kept.trim().to_string();
    if !kept.ends_with(TERMINAL_PUNCTUATION) {
        kept.push(ELLIPSIS);
    }
    kept
}

/// Keep the first `keep` characters and always end with a single ellipsis
pub(crate) fn truncate_with_ellipsis(text: &str, keep: usize) -> String {
    let kept: String = text.chars().take(keep).collect();
    let mut kept = kept.trim_end().to_string();
    if !kept.ends_with(ELLIPSIS) {
        kept.push(ELLIPSIS);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("café…"), 5);
    }

    #[test]
    fn test_optimal_windows() {
        assert!(is_optimal_title_length(40));
        assert!(is_optimal_title_length(60));
        assert!(!is_optimal_title_length(61));
        assert!(is_optimal_description_length(150));
        assert!(!is_optimal_description_length(139));
    }

    #[test]
    fn test_truncate_at_sentence() {
        assert_eq!(truncate_at_sentence("Hello world again", 11), "Hello world…");
        assert_eq!(truncate_at_sentence("Done. More text", 5), "Done.");
        // trailing space is trimmed before the ellipsis is added
        assert_eq!(truncate_at_sentence("Hello world", 6), "Hello…");
    }

    #[test]
    fn test_truncate_with_ellipsis_does_not_double() {
        assert_eq!(truncate_with_ellipsis("abc…def", 4), "abc…");
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc…");
    }

    #[test]
    fn test_default_optimizer_brand_suffix() {
        let optimizer = MetaOptimizer::default();
        assert_eq!(optimizer.brand_suffix(), " | Purrify");
        let custom = MetaOptimizer::new("Acme");
        assert_eq!(custom.brand_suffix(), " | Acme");
    }
}
