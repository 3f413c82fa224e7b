//! Description optimization: keyword and benefit advice, CTA padding, truncation

use tracing::debug;

use super::lexicon::mentions_any;
use super::{
    char_len, truncate_at_sentence, MetaOptimizer, META_DESCRIPTION_MAX_LENGTH,
    META_DESCRIPTION_MIN_LENGTH,
};
use crate::contracts::OptimizedDescription;

impl MetaOptimizer {
    /// Optimize a page description for search display
    pub fn optimize_description(
        &self,
        description: &str,
        target_keyword: Option<&str>,
    ) -> OptimizedDescription {
        let mut warnings = Vec::new();
        let mut optimized = description.trim().to_string();

        if let Some(keyword) = target_keyword.map(str::trim).filter(|k| !k.is_empty()) {
            if !optimized.to_lowercase().contains(&keyword.to_lowercase()) {
                warnings.push(format!("Consider adding target keyword: \"{}\"", keyword));
            }
        }

        if !mentions_any(&[&optimized], &self.lexicon.benefit) {
            warnings.push(
                "Consider adding benefit-driven words (stop, eliminate, instant, free, etc.)"
                    .to_string(),
            );
        }

        let original_length = char_len(&optimized);

        if original_length < META_DESCRIPTION_MIN_LENGTH {
            if let Some((cta, padded)) = self.first_fitting_cta(&optimized) {
                optimized = padded;
                warnings.push(format!("Added \"{}\" to reach optimal length", cta));
            }

            let length = char_len(&optimized);
            if length < META_DESCRIPTION_MIN_LENGTH {
                warnings.push(format!(
                    "Description is {} characters (optimal: {}-{})",
                    length, META_DESCRIPTION_MIN_LENGTH, META_DESCRIPTION_MAX_LENGTH
                ));
            }
        }

        if char_len(&optimized) > META_DESCRIPTION_MAX_LENGTH {
            optimized = truncate_at_sentence(&optimized, META_DESCRIPTION_MAX_LENGTH - 1);
            warnings.push(format!(
                "Truncated description from {} to {} characters",
                original_length,
                char_len(&optimized)
            ));
        }

        let text = self.normalizer.normalize_description(&optimized);
        let length = char_len(&text);
        debug!(length, warnings = warnings.len(), "Optimized description");

        OptimizedDescription {
            is_truncated: length < original_length,
            length,
            text,
            warnings,
        }
    }

    fn first_fitting_cta<'a>(&'a self, text: &str) -> Option<(&'a str, String)> {
        self.lexicon.cta_phrases.iter().find_map(|cta| {
            let candidate = if text.is_empty() {
                cta.clone()
            } else {
                format!("{} {}", text, cta)
            };
            (char_len(&candidate) <= META_DESCRIPTION_MAX_LENGTH).then(|| (cta.as_str(), candidate))
        })
    }
}
