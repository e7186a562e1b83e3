//! Data models for scored news articles and the comparative report.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawArticle`]: Raw article data parsed from the news feed, before scoring
//! - [`Article`]: A scored article with its sentiment label and confidence
//! - [`ComparativeReport`]: The aggregated analysis across a batch of articles
//! - [`NewsReport`]: The full envelope written to JSON output
//!
//! The wire shapes are deliberately tolerant. Every field of [`Article`] except
//! `sentiment` carries a serde default, and `sentiment_score` accepts only JSON
//! numbers (anything else quietly becomes `None`). A record without a
//! `sentiment` field is the one malformation that fails deserialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentiment label assigned to one article by the classifier.
///
/// `Unknown` marks an article that could not be scored at all (empty text,
/// classifier failure). It is tallied under its own label in the distribution
/// and never folded into `Neutral`; an `Unknown` article also carries no
/// numeric score, so it contributes nothing to the batch average.
///
/// The derived `Ord` follows declaration order, which keeps the key order of
/// the serialized distribution map stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    /// Compound polarity at or above the positive threshold.
    Positive,
    /// Compound polarity at or below the negative threshold.
    Negative,
    /// Polarity strictly between the two thresholds.
    Neutral,
    /// The article could not be scored; excluded from numeric averaging.
    Unknown,
}

impl Sentiment {
    /// The label as it appears in reports and narration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw news article as parsed from the Google News feed.
///
/// This is the unscored shape produced by the fetch stage. The classifier
/// turns it into an [`Article`] without touching any of the metadata.
#[derive(Debug, Clone)]
pub struct RawArticle {
    /// The headline, with any trailing publisher suffix already removed.
    pub title: String,
    /// Plain-text description from the feed; falls back to the headline
    /// when the feed item had no usable description.
    pub summary: String,
    /// Link to the article.
    pub url: String,
    /// Publication timestamp as reported by the feed, when present.
    pub publish_date: Option<String>,
    /// Publisher name as reported by the feed.
    pub source: String,
}

/// A scored news article: the input shape of the aggregation stage.
///
/// The aggregator only reads these. `url`, `publish_date`, and `source` are
/// opaque metadata passed through to the report unchanged. Order within a
/// batch matters only for the 1-based labels of the pairwise comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// The article headline. Expected non-empty, not enforced.
    #[serde(default)]
    pub title: String,
    /// The substantive content used for comparison and topic extraction.
    /// Missing on the wire means empty, never an error.
    #[serde(default)]
    pub summary: String,
    /// Sentiment label assigned upstream. The only required field.
    pub sentiment: Sentiment,
    /// Classifier confidence in [0, 1]. Missing, null, and non-numeric wire
    /// values all land here as `None` and are excluded from averaging.
    #[serde(default, deserialize_with = "lenient_score")]
    pub sentiment_score: Option<f64>,
    /// Link to the article. Opaque metadata.
    #[serde(default)]
    pub url: String,
    /// Publication timestamp. Opaque metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    /// Publisher name. Opaque metadata.
    #[serde(default)]
    pub source: String,
}

/// Deserialize a sentiment score leniently.
///
/// JSON numbers come through as `Some`; a missing field never reaches this
/// function at all (the serde default applies). Every other value, null and
/// strings and booleans included, becomes `None` instead of failing the batch.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// One pairwise coverage comparison between two articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageDifference {
    /// Which pair is being compared, by 1-based input position,
    /// e.g. `"Article 1 vs Article 3"`.
    pub comparison: String,
    /// Templated contrast sentence embedding a snippet of each summary.
    pub impact: String,
}

/// Per-article topic lists plus the most frequent topic across the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicOverlap {
    /// Retained topics per article, keyed `"Article {n}"` (1-based).
    pub unique_topics: BTreeMap<String, Vec<String>>,
    /// The single most frequent topic across all retained lists, or `None`
    /// when no topics were extracted from any article.
    pub common_topic: Option<String>,
}

/// The aggregated comparative analysis for one batch of scored articles.
///
/// Built fresh per run by [`crate::analysis::aggregate::compute_report`] and
/// never mutated afterwards; it is a plain value with no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeReport {
    /// Count per sentiment label. Labels with zero count are absent.
    pub sentiment_distribution: BTreeMap<Sentiment, usize>,
    /// Mean of the numeric scores, rounded to 3 decimal places; exactly 0.0
    /// when no article carried a numeric score.
    pub average_sentiment_score: f64,
    /// One record per unordered article pair, ascending by position.
    pub coverage_differences: Vec<CoverageDifference>,
    /// Per-article topics and the batch-wide common topic.
    pub topic_overlap: TopicOverlap,
    /// One of three fixed verdict strings.
    pub final_sentiment_verdict: String,
}

/// The full output envelope for one pipeline run.
///
/// Serialized to `{json_output_dir}/{date}/{company_slug}.json` and fed,
/// together with the article list it carries, to the narrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsReport {
    /// The company the articles were fetched for.
    pub company: String,
    /// Run date in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Run time in `HH:MM:SS.microseconds` format.
    pub local_time: String,
    /// The scored articles, in fetch order.
    pub articles: Vec<Article>,
    /// The comparative analysis over those articles.
    pub comparative_sentiment: ComparativeReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_display() {
        assert_eq!(Sentiment::Positive.to_string(), "Positive");
        assert_eq!(Sentiment::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_article_deserializes_with_numeric_score() {
        let json = r#"{
            "title": "Acme beats estimates",
            "summary": "Quarterly revenue up sharply.",
            "sentiment": "Positive",
            "sentiment_score": 0.82,
            "url": "https://example.com/a",
            "source": "Example Wire"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.sentiment, Sentiment::Positive);
        assert_eq!(article.sentiment_score, Some(0.82));
        assert_eq!(article.source, "Example Wire");
        assert_eq!(article.publish_date, None);
    }

    #[test]
    fn test_article_tolerates_non_numeric_score() {
        let json = r#"{"title": "t", "sentiment": "Neutral", "sentiment_score": "n/a"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.sentiment_score, None);

        let json = r#"{"title": "t", "sentiment": "Neutral", "sentiment_score": null}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.sentiment_score, None);

        let json = r#"{"title": "t", "sentiment": "Neutral", "sentiment_score": true}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.sentiment_score, None);
    }

    #[test]
    fn test_article_tolerates_missing_optional_fields() {
        let json = r#"{"title": "t", "sentiment": "Unknown"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.sentiment_score, None);
        assert_eq!(article.summary, "");
        assert_eq!(article.url, "");
        assert_eq!(article.source, "");
    }

    #[test]
    fn test_article_without_sentiment_is_rejected() {
        let json = r#"{"title": "t", "summary": "s", "sentiment_score": 0.5}"#;
        let result: Result<Article, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_distribution_serializes_with_label_keys() {
        let mut distribution = BTreeMap::new();
        distribution.insert(Sentiment::Positive, 2usize);
        distribution.insert(Sentiment::Unknown, 1usize);

        let value = serde_json::to_value(&distribution).unwrap();
        assert_eq!(value["Positive"], 2);
        assert_eq!(value["Unknown"], 1);
        assert!(value.get("Neutral").is_none());
    }

    #[test]
    fn test_news_report_round_trip() {
        let report = NewsReport {
            company: "Acme".to_string(),
            local_date: "2025-05-06".to_string(),
            local_time: "08:00:00".to_string(),
            articles: vec![],
            comparative_sentiment: ComparativeReport {
                sentiment_distribution: BTreeMap::new(),
                average_sentiment_score: 0.0,
                coverage_differences: vec![],
                topic_overlap: TopicOverlap::default(),
                final_sentiment_verdict: "Overall sentiment is neutral.".to_string(),
            },
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("comparative_sentiment"));
        assert!(json.contains("final_sentiment_verdict"));

        let back: NewsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.company, "Acme");
        assert_eq!(back.comparative_sentiment.average_sentiment_score, 0.0);
    }
}
