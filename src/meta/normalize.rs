//! Final normalization collaborator
//!
//! The optimizers hand their result to a [`MetaNormalizer`] as the last step.
//! The site-wide [`SiteNormalizer`] supplies defaults for empty input, pads
//! very short descriptions with a site blurb and hard-caps both fields; its
//! windows are the site's rendering limits, wider than the optimizer windows.

use super::{char_len, truncate_with_ellipsis};

/// Normalization applied to every optimized title and description
pub trait MetaNormalizer: Send + Sync {
    fn normalize_title(&self, title: &str) -> String;
    fn normalize_description(&self, description: &str) -> String;
}

/// Site padding appended to short descriptions
pub const DEFAULT_DESCRIPTION_PADDING: &str = "Explore Purrify activated carbon technology that neutralizes tough litter box odors and keeps homes fresh.";

/// Default site normalizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteNormalizer {
    pub title_fallback: String,
    pub description_padding: String,
    pub title_max_length: usize,
    pub description_min_length: usize,
    pub description_max_length: usize,
}

impl Default for SiteNormalizer {
    fn default() -> Self {
        Self::for_brand(super::DEFAULT_BRAND)
    }
}

impl SiteNormalizer {
    /// Normalizer whose empty-title fallback is the brand name
    pub fn for_brand(brand: &str) -> Self {
        Self {
            title_fallback: brand.to_string(),
            description_padding: DEFAULT_DESCRIPTION_PADDING.to_string(),
            title_max_length: 60,
            description_min_length: 110,
            description_max_length: 160,
        }
    }

    pub fn with_description_padding(mut self, padding: impl Into<String>) -> Self {
        self.description_padding = padding.into();
        self
    }
}

fn ensure_sentence_termination(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

impl MetaNormalizer for SiteNormalizer {
    fn normalize_title(&self, title: &str) -> String {
        let base = title.trim();
        if base.is_empty() {
            return self.title_fallback.clone();
        }
        if char_len(base) <= self.title_max_length {
            return base.to_string();
        }
        truncate_with_ellipsis(base, self.title_max_length - 1)
    }

    fn normalize_description(&self, description: &str) -> String {
        let mut text = description.trim().to_string();
        if text.is_empty() {
            text = self.description_padding.clone();
        }

        if char_len(&text) < self.description_min_length {
            text = format!(
                "{} {}",
                ensure_sentence_termination(&text),
                self.description_padding
            )
            .trim()
            .to_string();
        }

        if char_len(&text) > self.description_max_length {
            return truncate_with_ellipsis(&text, self.description_max_length - 1);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_title_falls_back_to_brand() {
        let normalizer = SiteNormalizer::for_brand("Purrify");
        assert_eq!(normalizer.normalize_title("   "), "Purrify");
        assert_eq!(normalizer.normalize_title(" Cat Litter "), "Cat Litter");
    }

    #[test]
    fn test_long_title_capped() {
        let normalizer = SiteNormalizer::default();
        let out = normalizer.normalize_title(&"x".repeat(80));
        assert_eq!(char_len(&out), 60);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_short_description_is_padded() {
        let normalizer = SiteNormalizer::default();
        let out = normalizer.normalize_description("Fresh home");
        assert!(out.starts_with("Fresh home. Explore Purrify"));
    }

    #[test]
    fn test_empty_description_gets_padding() {
        let normalizer = SiteNormalizer::default().with_description_padding("Padding text.");
        let out = normalizer.normalize_description("");
        assert!(out.starts_with("Padding text."));
        assert!(!out.is_empty());
    }

    #[test]
    fn test_in_window_description_untouched() {
        let normalizer = SiteNormalizer::default();
        let text = "A".repeat(150);
        assert_eq!(normalizer.normalize_description(&text), text);
    }
}
