use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MIN_CHARS: usize = 100;
pub const DEFAULT_MAX_CHARS: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Document appears to be empty or unreadable")]
    EmptyContent,
    #[error("Document too short for meaningful analysis (minimum {min} characters)")]
    TooShort { min: usize, actual: usize },
    #[error(
        "Document too long for analysis (maximum {max} characters). Please split into smaller sections."
    )]
    TooLong { max: usize, actual: usize },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Character bounds a document must satisfy to be analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLimits {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub word_count: usize,
    pub character_count: usize,
}

impl ContentStats {
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            word_count: text.split_whitespace().count(),
            character_count: text.chars().count(),
        }
    }
}

impl ContentLimits {
    #[must_use]
    pub const fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    /// Checks `text` against the bounds. Lengths are counted in characters;
    /// the lower bound applies to the trimmed text.
    pub fn validate(&self, text: &str) -> ValidationResult<ContentStats> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        let trimmed_len = trimmed.chars().count();
        if trimmed_len < self.min_chars {
            return Err(ValidationError::TooShort {
                min: self.min_chars,
                actual: trimmed_len,
            });
        }

        let stats = ContentStats::of(text);
        if stats.character_count > self.max_chars {
            return Err(ValidationError::TooLong {
                max: self.max_chars,
                actual: stats.character_count,
            });
        }

        Ok(stats)
    }
}

static PAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bpage\s+\d+\s+of\s+\d+\b").expect("page marker pattern is valid")
});

static NUMBER_ONLY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[^\S\n]*\d+[^\S\n]*$").expect("number line pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalizes extracted text before analysis.
///
/// Stripping a page marker can splice its neighbours into a new marker, so
/// the cleanup pass is repeated until the text stops changing. That makes the
/// function idempotent.
#[must_use]
pub fn preprocess(text: &str) -> String {
    let mut current = clean_pass(text);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.replace('\u{000C}', "\n");
    let text = PAGE_MARKER.replace_all(&text, "");
    let text = NUMBER_ONLY_LINE.replace_all(&text, "");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of_len(n: usize) -> String {
        "a".repeat(n)
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        let limits = ContentLimits::default();

        assert_eq!(limits.validate(""), Err(ValidationError::EmptyContent));
        assert_eq!(limits.validate(" \n\t "), Err(ValidationError::EmptyContent));
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let limits = ContentLimits::default();

        assert!(matches!(
            limits.validate(&text_of_len(99)),
            Err(ValidationError::TooShort { min: 100, actual: 99 })
        ));
        assert!(limits.validate(&text_of_len(100)).is_ok());
        assert!(limits.validate(&text_of_len(50_000)).is_ok());
        assert!(matches!(
            limits.validate(&text_of_len(50_001)),
            Err(ValidationError::TooLong { max: 50_000, actual: 50_001 })
        ));
    }

    #[test]
    fn test_short_check_uses_trimmed_length() {
        let limits = ContentLimits::default();
        let padded = format!("{}{}", " ".repeat(50), text_of_len(60));

        assert!(matches!(
            limits.validate(&padded),
            Err(ValidationError::TooShort { actual: 60, .. })
        ));
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let limits = ContentLimits::new(5, 10);

        assert!(limits.validate("ééééé").is_ok());
        assert!(limits.validate("éééééééééé").is_ok());
    }

    #[test]
    fn test_word_count_matches_whitespace_tokens() {
        let limits = ContentLimits::new(1, 1000);
        let text = "We  keep\tpersonal data\nfor thirty days.";

        let stats = limits.validate(text).unwrap();

        assert_eq!(stats.word_count, 7);
        assert_eq!(stats.character_count, text.chars().count());
    }

    #[test]
    fn test_preprocess_collapses_whitespace() {
        assert_eq!(preprocess("  a \t b\r\n\r\nc\rd  "), "a b c d");
    }

    #[test]
    fn test_preprocess_strips_form_feeds_and_page_markers() {
        let raw = "Privacy Policy\u{000C}Page 1 of 3\nWe collect data.\nPAGE 2  OF 3\n";

        assert_eq!(preprocess(raw), "Privacy Policy We collect data.");
    }

    #[test]
    fn test_preprocess_strips_number_only_lines() {
        let raw = "Section one\n  12  \nSection two\n3\nreferences 42 items";

        assert_eq!(preprocess(raw), "Section one Section two references 42 items");
    }

    #[test]
    fn test_preprocess_is_idempotent() {
        let samples = [
            "Page 1 Page 2 of 3 of 4 retained",
            "Page 1 of 2\n5",
            "Header\r\n\r\n  7 \r\nBody text\u{000C}Page\t9\tof\t9",
            "plain text",
            "",
        ];

        for sample in samples {
            let once = preprocess(sample);
            assert_eq!(preprocess(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_preprocess_removes_spliced_markers() {
        assert_eq!(preprocess("Page 1 Page 2 of 3 of 4 retained"), "retained");
    }
}
