//! Comparative aggregation over a batch of scored articles.
//!
//! This is the analytical heart of the pipeline. Given articles that already
//! carry sentiment labels and scores, [`compute_report`] produces the four
//! parts of a [`ComparativeReport`] in one pass:
//!
//! 1. **Distribution**: a tally of sentiment labels, `Unknown` included
//! 2. **Average score**: mean of the numeric scores, rounded to 3 decimals
//! 3. **Coverage differences**: one templated contrast per article pair
//! 4. **Topic overlap**: per-article topics plus the batch-wide common topic
//!
//! plus a three-way verdict derived from the distribution and the average.
//! The function is pure: it reads its inputs, allocates its output, and
//! touches nothing else, so concurrent callers need no coordination.

use crate::analysis::topics::TopicExtractor;
use crate::models::{Article, ComparativeReport, CoverageDifference, Sentiment, TopicOverlap};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Topics requested from the extractor per article when the caller does not
/// override the depth.
pub const DEFAULT_TOPIC_COUNT: usize = 3;

/// Characters of each summary embedded in a pairwise comparison.
const SNIPPET_CHARS: usize = 50;

/// Topics retained per article in the report, independent of how many the
/// extractor was asked for.
const TOPICS_SHOWN: usize = 2;

const VERDICT_POSITIVE: &str = "Overall sentiment is mostly positive.";
const VERDICT_NEGATIVE: &str = "Overall sentiment is mostly negative.";
const VERDICT_NEUTRAL: &str = "Overall sentiment is neutral.";

/// Build the comparative report for one batch of scored articles.
///
/// `articles` may be empty; the report then degenerates to an empty
/// distribution, a 0.0 average, no comparisons, no topics, and the neutral
/// verdict. Article order is preserved in the 1-based labels of the pairwise
/// comparisons and topic keys but carries no other meaning.
///
/// The pairwise stage is quadratic in the article count. Batches are capped
/// well below the point where that matters, and the output count and order
/// are part of the contract.
pub fn compute_report(
    articles: &[Article],
    extractor: &dyn TopicExtractor,
    topic_count: usize,
) -> ComparativeReport {
    let sentiment_distribution = tally_sentiments(articles);
    let average_sentiment_score = average_score(articles);
    let final_sentiment_verdict =
        final_verdict(&sentiment_distribution, average_sentiment_score).to_string();

    ComparativeReport {
        sentiment_distribution,
        average_sentiment_score,
        coverage_differences: coverage_differences(articles),
        topic_overlap: topic_overlap(articles, extractor, topic_count),
        final_sentiment_verdict,
    }
}

/// Tally sentiment labels across the batch.
///
/// Every article contributes exactly one count. `Unknown` is a label like
/// any other here, never folded into `Neutral`; labels nobody carries are
/// absent from the map rather than present with a zero.
fn tally_sentiments(articles: &[Article]) -> BTreeMap<Sentiment, usize> {
    let mut distribution = BTreeMap::new();
    for article in articles {
        *distribution.entry(article.sentiment).or_insert(0) += 1;
    }
    distribution
}

/// Mean of the well-formed numeric scores, rounded to 3 decimal places.
///
/// Articles without a numeric score (absent on the wire, or NaN/infinite)
/// are excluded from both the sum and the divisor. When nothing remains the
/// result is exactly 0.0, never a division by zero.
fn average_score(articles: &[Article]) -> f64 {
    let scores: Vec<f64> = articles
        .iter()
        .filter_map(|a| a.sentiment_score.filter(|s| s.is_finite()))
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (mean * 1000.0).round() / 1000.0
}

/// One comparison record per unordered article pair, ascending by position.
///
/// For n articles this emits n*(n-1)/2 records. Each impact sentence embeds
/// a hard 50-character cut of both summaries with an ellipsis marker always
/// appended, even when the summary was shorter than the cut.
fn coverage_differences(articles: &[Article]) -> Vec<CoverageDifference> {
    articles
        .iter()
        .enumerate()
        .tuple_combinations()
        .map(|((i, first), (j, second))| CoverageDifference {
            comparison: format!("Article {} vs Article {}", i + 1, j + 1),
            impact: format!(
                "Article {} discusses {}... while Article {} focuses on {}...",
                i + 1,
                snippet(&first.summary),
                j + 1,
                snippet(&second.summary),
            ),
        })
        .collect()
}

/// First [`SNIPPET_CHARS`] characters of a summary. A hard cut, possibly
/// mid-word; short summaries pass through whole.
fn snippet(summary: &str) -> String {
    summary.chars().take(SNIPPET_CHARS).collect()
}

/// Per-article topic lists plus the most frequent topic across the batch.
///
/// Extraction asks for `topic_count` topics but only the first
/// [`TOPICS_SHOWN`] are retained per article, and the common topic is
/// counted over those retained lists, in article order. Ties go to the
/// topic encountered first.
fn topic_overlap(
    articles: &[Article],
    extractor: &dyn TopicExtractor,
    topic_count: usize,
) -> TopicOverlap {
    let mut unique_topics = BTreeMap::new();
    let mut retained = Vec::new();
    for (i, article) in articles.iter().enumerate() {
        let mut topics = extractor.extract(&article.summary, topic_count);
        topics.truncate(TOPICS_SHOWN);
        retained.extend(topics.iter().cloned());
        unique_topics.insert(format!("Article {}", i + 1), topics);
    }

    TopicOverlap {
        unique_topics,
        common_topic: most_frequent(&retained),
    }
}

/// The most frequent string in `topics`, ties broken by first appearance.
/// `None` when the list is empty, never an empty string.
fn most_frequent(topics: &[String]) -> Option<String> {
    let mut counts: Vec<(&String, usize)> = Vec::new();
    for topic in topics {
        match counts.iter_mut().find(|(t, _)| *t == topic) {
            Some((_, n)) => *n += 1,
            None => counts.push((topic, 1)),
        }
    }

    let mut best: Option<(&String, usize)> = None;
    for (topic, count) in counts {
        // Strictly greater, so the first topic to reach a count wins ties.
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((topic, count));
        }
    }
    best.map(|(topic, _)| topic.clone())
}

/// Three-way verdict from the label counts and the average score.
///
/// Both conditions of a branch must hold. A lopsided count with a
/// middling average, or a strong average with balanced counts, falls
/// through to neutral. The thresholds are strict comparisons: an average
/// of exactly 0.6 is not "mostly positive".
fn final_verdict(distribution: &BTreeMap<Sentiment, usize>, avg_score: f64) -> &'static str {
    let positive = distribution.get(&Sentiment::Positive).copied().unwrap_or(0);
    let negative = distribution.get(&Sentiment::Negative).copied().unwrap_or(0);

    if positive > negative && avg_score > 0.6 {
        VERDICT_POSITIVE
    } else if negative > positive && avg_score < 0.4 {
        VERDICT_NEGATIVE
    } else {
        VERDICT_NEUTRAL
    }
}
