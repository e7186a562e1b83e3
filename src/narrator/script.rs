//! Narration script assembly.
//!
//! The spoken report follows a fixed Hindi frame; every dynamic piece of the
//! report (titles, summaries, comparisons, topics, the verdict) is translated
//! through a [`RemoteCall`] and spliced into that frame. Sentiment labels and
//! the `Article {n}` topic keys stay in English, matching how the distribution
//! keys and report fields are written.
//!
//! Translation is the slow part, so the pieces go through an order-preserving
//! bounded-concurrency stream before assembly.

use crate::models::{NewsReport, Sentiment};
use crate::narrator::remote::RemoteCall;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeMap, VecDeque};
use std::error::Error;
use tracing::{info, instrument};

/// Concurrent in-flight translation requests while building a script.
const TRANSLATE_CONCURRENCY: usize = 4;

/// Build the full narration script for one report.
///
/// The frame layout: an opening header, one block per article (title,
/// summary, sentiment), the distribution counts, every pairwise comparison,
/// the common topic (or its absence), the per-article topics, and the final
/// verdict. Blocks appear in article order regardless of map key order.
#[instrument(level = "info", skip_all, fields(company = %report.company))]
pub async fn build_script<T>(translator: &T, report: &NewsReport) -> Result<String, Box<dyn Error>>
where
    T: RemoteCall<Response = String>,
{
    let overlap = &report.comparative_sentiment.topic_overlap;

    // Every dynamic piece, in the exact order the assembly below consumes
    // them back out of the queue.
    let mut pieces: Vec<String> = Vec::new();
    for article in &report.articles {
        pieces.push(article.title.clone());
        pieces.push(article.summary.clone());
    }
    for difference in &report.comparative_sentiment.coverage_differences {
        pieces.push(difference.comparison.clone());
        pieces.push(difference.impact.clone());
    }
    if let Some(topic) = &overlap.common_topic {
        pieces.push(topic.clone());
    }
    for i in 1..=report.articles.len() {
        if let Some(topics) = overlap.unique_topics.get(&article_label(i)) {
            pieces.extend(topics.iter().cloned());
        }
    }
    pieces.push(report.comparative_sentiment.final_sentiment_verdict.clone());

    let piece_count = pieces.len();
    let translated: Vec<String> = stream::iter(pieces)
        .map(|piece| async move { translator.call(&piece).await })
        .buffered(TRANSLATE_CONCURRENCY)
        .try_collect()
        .await?;
    let mut queue: VecDeque<String> = translated.into();
    info!(pieces = piece_count, "Translated narration pieces");

    let mut script = String::from("न्यूज़ रिपोर्ट का विश्लेषण:\n\n");
    for (i, article) in report.articles.iter().enumerate() {
        let title = take(&mut queue)?;
        let summary = take(&mut queue)?;
        script.push_str(&format!("लेख {}:\n", i + 1));
        script.push_str(&format!("शीर्षक: {title}।\n"));
        script.push_str(&format!("सारांश: {summary}।\n"));
        script.push_str(&format!("भावना: {}।\n\n", article.sentiment));
    }

    script.push_str("तुलनात्मक विश्लेषण:\n\n");
    let distribution = &report.comparative_sentiment.sentiment_distribution;
    script.push_str(&format!(
        "सकारात्मक लेख: {}।\n",
        label_count(distribution, Sentiment::Positive)
    ));
    script.push_str(&format!(
        "नकारात्मक लेख: {}।\n",
        label_count(distribution, Sentiment::Negative)
    ));
    script.push_str(&format!(
        "तटस्थ लेख: {}।\n\n",
        label_count(distribution, Sentiment::Neutral)
    ));

    script.push_str("लेखों के बीच तुलना:\n");
    for _ in &report.comparative_sentiment.coverage_differences {
        let comparison = take(&mut queue)?;
        let impact = take(&mut queue)?;
        script.push_str(&format!("{comparison}।\n"));
        script.push_str(&format!("प्रभाव: {impact}।\n\n"));
    }

    match &overlap.common_topic {
        Some(_) => {
            let topic = take(&mut queue)?;
            script.push_str(&format!("सामान्य विषय: {topic}।\n\n"));
        }
        None => script.push_str("कोई सामान्य विषय नहीं पाया गया।\n\n"),
    }

    script.push_str("प्रत्येक लेख के अनूठे विषय:\n");
    for i in 1..=report.articles.len() {
        let label = article_label(i);
        if let Some(topics) = overlap.unique_topics.get(&label) {
            let mut translated_topics = Vec::with_capacity(topics.len());
            for _ in topics {
                translated_topics.push(take(&mut queue)?);
            }
            script.push_str(&format!("{label}: {}।\n", translated_topics.join(", ")));
        }
    }

    let verdict = take(&mut queue)?;
    script.push_str("\nअंतिम भावना विश्लेषण:\n");
    script.push_str(&format!("{verdict}।\n"));

    Ok(script)
}

fn article_label(position: usize) -> String {
    format!("Article {position}")
}

fn label_count(distribution: &BTreeMap<Sentiment, usize>, label: Sentiment) -> usize {
    distribution.get(&label).copied().unwrap_or(0)
}

/// The piece queue and the assembly walk the report in the same order, so an
/// empty pop means the two went out of sync.
fn take(queue: &mut VecDeque<String>) -> Result<String, Box<dyn Error>> {
    queue
        .pop_front()
        .ok_or_else(|| "narration piece missing after translation".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, ComparativeReport, CoverageDifference, TopicOverlap};

    /// Marks each piece instead of translating, so tests can see exactly
    /// which text landed in which slot.
    #[derive(Debug)]
    struct EchoTranslator;

    impl RemoteCall for EchoTranslator {
        type Response = String;

        async fn call(&self, text: &str) -> Result<String, Box<dyn Error>> {
            Ok(format!("[hi]{text}"))
        }
    }

    fn sample_report(common_topic: Option<String>) -> NewsReport {
        let mut distribution = BTreeMap::new();
        distribution.insert(Sentiment::Positive, 1);
        distribution.insert(Sentiment::Negative, 1);

        let mut unique_topics = BTreeMap::new();
        unique_topics.insert("Article 1".to_string(), vec!["growth".to_string()]);
        unique_topics.insert(
            "Article 2".to_string(),
            vec!["lawsuit".to_string(), "supplier".to_string()],
        );

        NewsReport {
            company: "Acme".to_string(),
            local_date: "2025-08-25".to_string(),
            local_time: "10:00:00".to_string(),
            articles: vec![
                Article {
                    title: "Profits soar".to_string(),
                    summary: "Acme beat estimates".to_string(),
                    sentiment: Sentiment::Positive,
                    sentiment_score: Some(0.9),
                    url: String::new(),
                    publish_date: None,
                    source: "Wire".to_string(),
                },
                Article {
                    title: "Lawsuit filed".to_string(),
                    summary: "A supplier sued Acme".to_string(),
                    sentiment: Sentiment::Negative,
                    sentiment_score: Some(0.2),
                    url: String::new(),
                    publish_date: None,
                    source: "Ledger".to_string(),
                },
            ],
            comparative_sentiment: ComparativeReport {
                sentiment_distribution: distribution,
                average_sentiment_score: 0.55,
                coverage_differences: vec![CoverageDifference {
                    comparison: "Article 1 vs Article 2".to_string(),
                    impact: "Article 1 discusses growth... while Article 2 focuses on court..."
                        .to_string(),
                }],
                topic_overlap: TopicOverlap {
                    unique_topics,
                    common_topic,
                },
                final_sentiment_verdict: "Overall sentiment is neutral.".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_script_contains_translated_article_blocks() {
        let report = sample_report(Some("acme".to_string()));
        let script = build_script(&EchoTranslator, &report).await.unwrap();

        assert!(script.starts_with("न्यूज़ रिपोर्ट का विश्लेषण:\n\n"));
        assert!(script.contains("लेख 1:\n"));
        assert!(script.contains("शीर्षक: [hi]Profits soar।"));
        assert!(script.contains("सारांश: [hi]Acme beat estimates।"));
        assert!(script.contains("भावना: Positive।"));
        assert!(script.contains("लेख 2:\n"));
        assert!(script.contains("भावना: Negative।"));
    }

    #[tokio::test]
    async fn test_script_distribution_and_comparisons() {
        let report = sample_report(Some("acme".to_string()));
        let script = build_script(&EchoTranslator, &report).await.unwrap();

        assert!(script.contains("सकारात्मक लेख: 1।"));
        assert!(script.contains("नकारात्मक लेख: 1।"));
        assert!(script.contains("तटस्थ लेख: 0।"));
        assert!(script.contains("[hi]Article 1 vs Article 2।"));
        assert!(script.contains("प्रभाव: [hi]Article 1 discusses growth"));
    }

    #[tokio::test]
    async fn test_script_topics_and_verdict() {
        let report = sample_report(Some("acme".to_string()));
        let script = build_script(&EchoTranslator, &report).await.unwrap();

        assert!(script.contains("सामान्य विषय: [hi]acme।"));
        assert!(script.contains("Article 1: [hi]growth।"));
        assert!(script.contains("Article 2: [hi]lawsuit, [hi]supplier।"));
        assert!(script.contains("अंतिम भावना विश्लेषण:\n[hi]Overall sentiment is neutral.।"));
    }

    #[tokio::test]
    async fn test_script_without_common_topic() {
        let report = sample_report(None);
        let script = build_script(&EchoTranslator, &report).await.unwrap();

        assert!(script.contains("कोई सामान्य विषय नहीं पाया गया।"));
        assert!(!script.contains("सामान्य विषय:"));
    }

    #[tokio::test]
    async fn test_script_for_empty_report() {
        let mut report = sample_report(None);
        report.articles.clear();
        report.comparative_sentiment.coverage_differences.clear();
        report.comparative_sentiment.topic_overlap = TopicOverlap::default();
        report.comparative_sentiment.sentiment_distribution.clear();

        let script = build_script(&EchoTranslator, &report).await.unwrap();
        assert!(script.contains("सकारात्मक लेख: 0।"));
        assert!(script.contains("[hi]Overall sentiment is neutral.।"));
    }
}
