//! # News Pulse
//!
//! A news sentiment pipeline that fetches recent coverage for a company,
//! scores each article with a lexicon sentiment classifier, aggregates the
//! batch into a comparative report, and optionally narrates the report as
//! spoken Hindi audio.
//!
//! ## Features
//!
//! - Fetches articles from the Google News RSS search feed
//! - Scores each article's sentiment with a valence lexicon (no network calls)
//! - Builds a comparative report: distribution, average score, pairwise
//!   coverage differences, topic overlap, and a final verdict
//! - Outputs a JSON report file and an optional Markdown rendering
//! - Optionally translates the report to Hindi and synthesizes an MP3
//!
//! ## Usage
//!
//! ```sh
//! news_pulse --company "Tesla" -j ./json -m ./markdown -a ./audio
//! news_pulse --articles-json scored.json -j ./json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetch**: Pull up to `--limit` articles from the Google News feed
//! 2. **Score**: Classify each article's sentiment locally
//! 3. **Aggregate**: Build the comparative report (pure, synchronous)
//! 4. **Output**: Write JSON, optional Markdown, optional spoken summary

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod analysis;
mod cli;
mod config;
mod models;
mod narrator;
mod outputs;
mod scrapers;
mod utils;

use analysis::aggregate::compute_report;
use analysis::sentiment::LexiconSentimentClassifier;
use analysis::topics::KeywordTopicExtractor;
use cli::Cli;
use config::load_config;
use models::{Article, NewsReport};
use outputs::{json, markdown};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_pulse starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, ?args.audio_output_dir, "Parsed CLI arguments");

    if args.company.is_none() && args.articles_json.is_none() {
        error!("Either --company or --articles-json must be given");
        return Err("either --company or --articles-json is required".into());
    }

    // --- Load config ---
    let config = load_config(args.config.as_deref())?;
    match args.config.as_deref() {
        Some(path) => info!(config_path = %path, "Loaded configuration"),
        None => info!("Using default configuration"),
    }

    // Early check: ensure JSON output dir is writable
    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = reqwest::Client::builder()
        .user_agent(&config.fetch.user_agent)
        .timeout(std::time::Duration::from_secs(config.fetch.timeout_secs))
        .build()?;

    // ---- Fetch and score articles ----
    let (company, articles): (String, Vec<Article>) = match (&args.company, &args.articles_json) {
        (Some(company), _) => {
            let raw = scrapers::google_news::search_articles(&client, company, args.limit).await?;
            info!(count = raw.len(), "Fetched articles");

            let classifier = LexiconSentimentClassifier::new();
            (company.clone(), classifier.score_articles(raw))
        }
        (None, Some(path)) => {
            let content = tokio::fs::read_to_string(path).await?;
            let articles: Vec<Article> = serde_json::from_str(&content)?;
            info!(path = %path, count = articles.len(), "Loaded pre-scored articles");

            // No company name on the wire; label the report after the file.
            let company = std::path::Path::new(path)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("articles")
                .to_string();
            (company, articles)
        }
        (None, None) => unreachable!("input presence checked above"),
    };

    if articles.is_empty() {
        error!(company = %company, "No articles to analyze");
        return Err(format!("no articles found for {}", company).into());
    }

    // ---- Aggregate ----
    let extractor = KeywordTopicExtractor::new();
    let comparative_sentiment = compute_report(&articles, &extractor, config.analysis.topic_count);

    let local_date = Local::now().date_naive().to_string();
    let local_time = Local::now().time().to_string();
    let report = NewsReport {
        company,
        local_date,
        local_time,
        articles,
        comparative_sentiment,
    };
    info!(
        company = %report.company,
        local_date = %report.local_date,
        article_count = report.articles.len(),
        verdict = %report.comparative_sentiment.final_sentiment_verdict,
        "Report assembled"
    );

    // ---- JSON output ----
    if let Err(e) = json::write_report(&report, &args.json_output_dir).await {
        error!(error = %e, "Failed to write JSON report");
    }

    // ---- Markdown output ----
    if let Some(markdown_output_dir) = &args.markdown_output_dir {
        if let Err(e) = markdown::write_markdown(&report, markdown_output_dir).await {
            error!(error = %e, "Failed to write Markdown report");
        }
    }

    // ---- Narration ----
    if let Some(audio_output_dir) = &args.audio_output_dir {
        match narrator::narrate_report(&client, &config.narrator, &report, audio_output_dir).await {
            Ok(path) => info!(path = %path, "Wrote narration audio"),
            Err(e) => {
                error!(error = %e, "Narration failed; JSON and Markdown reports are unaffected")
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
