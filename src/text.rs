use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug)]
pub struct TextNormalizer {
    punctuation_gap: Regex,
    ordinal_gap: Regex,
    slug_separator: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            punctuation_gap: Regex::new(r"\s+([,.;:])")
                .context("failed to compile punctuation gap regex")?,
            ordinal_gap: Regex::new(r"(?i)(\d+)\s+(st|nd|rd|th)\b")
                .context("failed to compile ordinal gap regex")?,
            slug_separator: Regex::new(r"[^a-z0-9]+")
                .context("failed to compile slug separator regex")?,
        })
    }

    pub fn normalize(&self, value: &str) -> String {
        let collapsed = condense_whitespace(&value.replace('\u{00A0}', " "));
        let without_punctuation_gaps = self.punctuation_gap.replace_all(&collapsed, "$1");
        self.ordinal_gap
            .replace_all(&without_punctuation_gaps, "$1$2")
            .into_owned()
    }

    pub fn slugify(&self, value: &str) -> String {
        let lowered = value.to_lowercase();
        self.slug_separator
            .replace_all(&lowered, "-")
            .trim_matches('-')
            .to_string()
    }
}

pub fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub fn is_unassigned(description: &str) -> bool {
    let normalized = description.to_lowercase();
    normalized.contains("unassigned") || normalized.contains("not assigned")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_punctuation_gaps() {
        let normalizer = TextNormalizer::new().expect("normalizer");
        assert_eq!(
            normalizer.normalize("  Philosophy\u{00A0}&   psychology ,  general ; misc . "),
            "Philosophy & psychology, general; misc."
        );
    }

    #[test]
    fn normalize_rejoins_ordinal_suffixes() {
        let normalizer = TextNormalizer::new().expect("normalizer");
        assert_eq!(normalizer.normalize("20 th century"), "20th century");
        assert_eq!(normalizer.normalize("the 1 ST floor"), "the 1ST floor");
        assert_eq!(normalizer.normalize("3 stories"), "3 stories");
    }

    #[test]
    fn slugify_joins_alphanumeric_runs() {
        let normalizer = TextNormalizer::new().expect("normalizer");
        assert_eq!(normalizer.slugify("The 300s"), "the-300s");
        assert_eq!(
            normalizer.slugify("--350 Public administration & military science!"),
            "350-public-administration-military-science"
        );
    }

    #[test]
    fn unassigned_detection_is_case_insensitive() {
        assert!(is_unassigned("[Unassigned]"));
        assert!(is_unassigned("Optional number, NOT ASSIGNED"));
        assert!(!is_unassigned("Assigned collections"));
    }
}
