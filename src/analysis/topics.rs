//! Keyword-based topic extraction from article summaries.
//!
//! The aggregation stage does not care how topics are produced, only that the
//! extractor returns an ordered list of strings. [`TopicExtractor`] is the
//! seam; [`KeywordTopicExtractor`] is the built-in implementation, ranking
//! lowercased tokens by frequency after stop-word filtering. Swapping in a
//! model-backed extractor only requires implementing the trait.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Extracts the leading topics from a piece of text.
///
/// Implementations must be deterministic for a given input within a run so
/// that the aggregator's tie-breaking stays stable. The returned list is
/// ordered most-relevant first and contains at most `top_n` entries.
pub trait TopicExtractor {
    /// Extract up to `top_n` topics from `text`, most relevant first.
    fn extract(&self, text: &str, top_n: usize) -> Vec<String>;
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)*").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
        "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
        "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself",
        "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once",
        "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so",
        "some", "such", "than", "that", "the", "their", "theirs", "them", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "upon",
        "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
        "why", "will", "with", "would", "you", "your", "yours",
    ]
    .into_iter()
    .collect()
});

/// Frequency-ranked keyword extractor.
///
/// Tokenizes on lowercased alphanumeric runs, strips possessive suffixes,
/// drops stop words, single characters, and bare numbers, then ranks the
/// remaining tokens by occurrence count. Ties keep first-appearance order,
/// so the output is fully deterministic for a given input.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTopicExtractor;

impl KeywordTopicExtractor {
    pub fn new() -> Self {
        KeywordTopicExtractor
    }
}

impl TopicExtractor for KeywordTopicExtractor {
    fn extract(&self, text: &str, top_n: usize) -> Vec<String> {
        let lowered = text.to_lowercase();

        // Count in first-appearance order; the stable sort below then keeps
        // that order for tokens with equal counts.
        let mut counts: Vec<(String, usize)> = Vec::new();
        for token_match in TOKEN_RE.find_iter(&lowered) {
            let token = token_match.as_str().trim_end_matches("'s");
            if token.len() < 2 || STOP_WORDS.contains(token) {
                continue;
            }
            if token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            match counts.iter_mut().find(|(t, _)| t == token) {
                Some((_, n)) => *n += 1,
                None => counts.push((token.to_string(), 1)),
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().take(top_n).map(|(t, _)| t).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filters_stop_words() {
        let extractor = KeywordTopicExtractor::new();
        let topics = extractor.extract("the cat sat on the mat", 5);
        assert_eq!(topics, vec!["cat", "sat", "mat"]);
    }

    #[test]
    fn test_extract_ranks_by_frequency() {
        let extractor = KeywordTopicExtractor::new();
        let topics = extractor.extract("rocket launch delayed again, rocket engineers confident", 2);
        assert_eq!(topics[0], "rocket");
        assert_eq!(topics.len(), 2);
    }

    #[test]
    fn test_extract_breaks_ties_by_first_appearance() {
        let extractor = KeywordTopicExtractor::new();
        let topics = extractor.extract("alpha beta alpha beta", 3);
        assert_eq!(topics, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_extract_respects_top_n() {
        let extractor = KeywordTopicExtractor::new();
        let topics = extractor.extract("one two three four five six seven", 3);
        assert_eq!(topics.len(), 3);
    }

    #[test]
    fn test_extract_empty_text() {
        let extractor = KeywordTopicExtractor::new();
        assert!(extractor.extract("", 3).is_empty());
        assert!(extractor.extract("   ", 3).is_empty());
    }

    #[test]
    fn test_extract_folds_case_and_possessives() {
        let extractor = KeywordTopicExtractor::new();
        let topics = extractor.extract("Tesla's profits surprised Tesla investors", 2);
        assert_eq!(topics[0], "tesla");
    }

    #[test]
    fn test_extract_drops_bare_numbers() {
        let extractor = KeywordTopicExtractor::new();
        let topics = extractor.extract("2025 2026 earnings", 3);
        assert_eq!(topics, vec!["earnings"]);
    }

    #[test]
    fn test_extract_keeps_two_char_alphanumerics() {
        let extractor = KeywordTopicExtractor::new();
        let topics = extractor.extract("q3 ai spending, a i", 5);
        assert_eq!(topics, vec!["q3", "ai", "spending"]);
    }
}
