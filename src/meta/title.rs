//! Title optimization: keyword front-loading, brand-suffix removal, truncation

use regex::RegexBuilder;
use tracing::debug;

use super::{
    char_len, truncate_at_sentence, MetaOptimizer, META_TITLE_MAX_LENGTH, META_TITLE_MIN_LENGTH,
};
use crate::contracts::OptimizedTitle;

impl MetaOptimizer {
    /// Optimize a page title for search display
    pub fn optimize_title(&self, title: &str, target_keyword: Option<&str>) -> OptimizedTitle {
        let mut warnings = Vec::new();
        let mut optimized = title.trim().to_string();

        if let Some(keyword) = target_keyword.map(str::trim).filter(|k| !k.is_empty()) {
            let title_lower = optimized.to_lowercase();
            let keyword_lower = keyword.to_lowercase();

            if !title_lower.contains(&keyword_lower) {
                warnings.push(format!(
                    "Consider including target keyword \"{}\" in title",
                    keyword
                ));
            } else if !title_lower.starts_with(&keyword_lower) {
                if let Some(front_loaded) = front_load(&optimized, keyword) {
                    optimized = front_loaded;
                    warnings.push("Moved target keyword to front of title".to_string());
                }
            }
        }

        let original_length = char_len(&optimized);

        if original_length > META_TITLE_MAX_LENGTH {
            if optimized.contains(self.brand_suffix.as_str()) {
                optimized = optimized
                    .replacen(self.brand_suffix.as_str(), "", 1)
                    .trim()
                    .to_string();
                warnings.push(format!(
                    "Removed \"{}\" suffix to fit length limit",
                    self.brand_suffix
                ));
            }

            if char_len(&optimized) > META_TITLE_MAX_LENGTH {
                optimized = truncate_at_sentence(&optimized, META_TITLE_MAX_LENGTH - 1);
                warnings.push(format!(
                    "Truncated title from {} to {} characters",
                    original_length,
                    char_len(&optimized)
                ));
            }
        }

        let length = char_len(&optimized);
        if length < META_TITLE_MIN_LENGTH {
            warnings.push(format!(
                "Title is {} characters (optimal: {}-{})",
                length, META_TITLE_MIN_LENGTH, META_TITLE_MAX_LENGTH
            ));
        }

        let text = self.normalizer.normalize_title(&optimized);
        let length = char_len(&text);
        debug!(length, warnings = warnings.len(), "Optimized title");

        OptimizedTitle {
            is_truncated: length < original_length,
            length,
            text,
            warnings,
        }
    }
}

/// Rebuild `title` as `"<keyword> - <rest>"` when the keyword occurs as a
/// whole word after the first character.
fn front_load(title: &str, keyword: &str) -> Option<String> {
    let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
        .ok()?;
    let found = pattern.find(title)?;
    if found.start() == 0 {
        return None;
    }

    let before = title[..found.start()].trim();
    let after = title[found.end()..].trim();
    let remaining = [before, after]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if remaining.is_empty() {
        Some(keyword.to_string())
    } else {
        Some(format!("{} - {}", keyword, remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimizer() -> MetaOptimizer {
        MetaOptimizer::default()
    }

    #[test]
    fn test_keyword_moved_to_front() {
        let result = optimizer().optimize_title(
            "Best Solution for Cat Litter Smell Problems",
            Some("cat litter smell"),
        );
        assert!(result.text.starts_with("cat litter smell - "));
        assert_eq!(result.text, "cat litter smell - Best Solution for Problems");
        assert!(result
            .warnings
            .contains(&"Moved target keyword to front of title".to_string()));
    }

    #[test]
    fn test_keyword_already_at_front() {
        let result = optimizer().optimize_title(
            "Cat Litter Odor Control - Natural Activated Carbon",
            Some("cat litter"),
        );
        assert!(!result.warnings.iter().any(|w| w.contains("Moved")));
        assert_eq!(result.text, "Cat Litter Odor Control - Natural Activated Carbon");
        assert_eq!(result.length, 50);
        assert!(!result.is_truncated);
    }

    #[test]
    fn test_missing_keyword_warns() {
        let result = optimizer()
            .optimize_title("Natural Activated Carbon Deodorizer for Homes", Some("litter"));
        assert_eq!(
            result.warnings[0],
            "Consider including target keyword \"litter\" in title"
        );
    }

    #[test]
    fn test_blank_keyword_ignored() {
        let result =
            optimizer().optimize_title("Natural Activated Carbon Deodorizer for Homes", Some("  "));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_suffix_removed_before_truncating() {
        let result = optimizer().optimize_title(
            "Very Long Product Title That Exceeds Character Limit | Purrify",
            None,
        );
        assert_eq!(result.text, "Very Long Product Title That Exceeds Character Limit");
        assert_eq!(result.length, 52);
        assert!(result.is_truncated);
        assert_eq!(
            result.warnings,
            vec!["Removed \" | Purrify\" suffix to fit length limit".to_string()]
        );
    }

    #[test]
    fn test_long_title_truncated_with_ellipsis() {
        let title = "An Extremely Long Title About Activated Carbon Cat Litter Additives And Odor";
        let result = optimizer().optimize_title(title, None);
        assert!(result.length <= 60);
        assert!(result.is_truncated);
        assert!(result.text.ends_with('…'));
        assert!(result.warnings[0].starts_with("Truncated title from 76 to 60 characters"));
    }

    #[test]
    fn test_short_title_warns() {
        let result = optimizer().optimize_title("Cat Litter", None);
        assert_eq!(
            result.warnings,
            vec!["Title is 10 characters (optimal: 40-60)".to_string()]
        );
        assert!(!result.is_truncated);
    }

    #[test]
    fn test_keyword_only_title() {
        assert_eq!(front_load("the odor", "odor"), Some("odor - the".to_string()));
        assert_eq!(front_load("odor control", "odor"), None);
        assert_eq!(front_load("malodorous", "odor"), None);
    }

    #[test]
    fn test_keyword_with_regex_metacharacters() {
        let result = optimizer().optimize_title("Why pick c++ litter", Some("c++"));
        // `\b` cannot follow `+`, so the keyword is present but never moved
        assert!(!result.warnings.iter().any(|w| w.contains("Moved")));
    }
}
