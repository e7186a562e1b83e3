//! Markdown output generation.
//!
//! Renders a [`NewsReport`] as a human-readable Markdown document and writes
//! it next to the JSON output when a Markdown directory is configured.
//!
//! # Output Path
//!
//! The file is written to: `{markdown_output_dir}/{local_date}_{company_slug}.md`

use crate::models::NewsReport;
use crate::utils::slugify_title;
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{error, info, instrument};

/// Render a full report as a Markdown document.
pub fn report_to_markdown(report: &NewsReport) -> String {
    let mut md = String::new();

    writeln!(md, "# News coverage: {}\n", report.company).unwrap();
    writeln!(
        md,
        "Generated on {} at {}.\n",
        report.local_date, report.local_time
    )
    .unwrap();

    writeln!(md, "## Articles\n").unwrap();
    for (i, article) in report.articles.iter().enumerate() {
        writeln!(md, "### {}. {}\n", i + 1, article.title).unwrap();
        writeln!(md, "- Source: {}", article.source).unwrap();
        if let Some(date) = &article.publish_date {
            writeln!(md, "- Published: {}", date).unwrap();
        }
        if !article.url.is_empty() {
            writeln!(md, "- Link: <{}>", article.url).unwrap();
        }
        match article.sentiment_score {
            Some(score) => writeln!(
                md,
                "- Sentiment: {} (score {:.3})",
                article.sentiment, score
            )
            .unwrap(),
            None => writeln!(md, "- Sentiment: {}", article.sentiment).unwrap(),
        }
        writeln!(md, "\n{}\n", article.summary).unwrap();
    }

    let analysis = &report.comparative_sentiment;

    writeln!(md, "## Comparative analysis\n").unwrap();
    writeln!(md, "### Sentiment distribution\n").unwrap();
    for (sentiment, count) in &analysis.sentiment_distribution {
        writeln!(md, "- {}: {}", sentiment, count).unwrap();
    }
    writeln!(
        md,
        "\nAverage sentiment score: {:.3}\n",
        analysis.average_sentiment_score
    )
    .unwrap();

    if !analysis.coverage_differences.is_empty() {
        writeln!(md, "### Coverage differences\n").unwrap();
        for (i, difference) in analysis.coverage_differences.iter().enumerate() {
            writeln!(md, "{}. {}", i + 1, difference.comparison).unwrap();
            writeln!(md, "   Impact: {}\n", difference.impact).unwrap();
        }
    }

    writeln!(md, "### Topic overlap\n").unwrap();
    match &analysis.topic_overlap.common_topic {
        Some(topic) => writeln!(md, "Common topic: {}\n", topic).unwrap(),
        None => writeln!(md, "No common topic found.\n").unwrap(),
    }
    // Walk labels in article order rather than map order, which would put
    // "Article 10" before "Article 2".
    for i in 1..=report.articles.len() {
        let label = format!("Article {}", i);
        if let Some(topics) = analysis.topic_overlap.unique_topics.get(&label) {
            if topics.is_empty() {
                writeln!(md, "- {}: (none)", label).unwrap();
            } else {
                writeln!(md, "- {}: {}", label, topics.join(", ")).unwrap();
            }
        }
    }

    writeln!(md, "\n## Verdict\n").unwrap();
    writeln!(md, "{}", analysis.final_sentiment_verdict).unwrap();

    md
}

/// Write the Markdown rendering of a report to disk.
///
/// # Output Path
///
/// The file is written to: `{markdown_output_dir}/{local_date}_{company_slug}.md`
#[instrument(level = "info", skip_all, fields(markdown_output_dir = %markdown_output_dir))]
pub async fn write_markdown(
    report: &NewsReport,
    markdown_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let md = report_to_markdown(report);

    let markdown_output_dir = markdown_output_dir.trim_end_matches('/');
    if let Err(e) = fs::create_dir_all(markdown_output_dir).await {
        error!(%markdown_output_dir, error = %e, "Failed to create Markdown dir");
        return Err(e.into());
    }

    let markdown_filename = format!(
        "{}/{}_{}.md",
        markdown_output_dir,
        report.local_date,
        slugify_title(&report.company)
    );

    info!(path = %markdown_filename, "Writing Markdown");
    fs::write(&markdown_filename, md).await?;
    info!(path = %markdown_filename, "Wrote Markdown report file");

    Ok(markdown_filename)
}
