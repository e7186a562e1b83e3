//! Command-line interface definitions for the news sentiment pipeline.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the news sentiment pipeline.
///
/// The pipeline needs exactly one input: either a company name to fetch live
/// coverage for, or a JSON file of already-scored articles. Output options
/// control which report formats are written.
///
/// # Examples
///
/// ```sh
/// # Fetch, score, and report on live coverage
/// news_pulse --company "Tesla" -j ./json
///
/// # Aggregate a pre-scored article file
/// news_pulse --articles-json scored.json -j ./json
///
/// # Full run with Markdown report and spoken Hindi summary
/// news_pulse -c "Tesla" --limit 10 -j ./json -m ./markdown -a ./audio
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Company name to search news coverage for
    #[arg(short, long, conflicts_with = "articles_json")]
    pub company: Option<String>,

    /// Path to a JSON file of pre-scored articles (skips the fetch and score stages)
    #[arg(long)]
    pub articles_json: Option<String>,

    /// Maximum number of articles to fetch
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Output directory for the JSON report file
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown report (optional)
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Output directory for the spoken-summary MP3 (optional, enables narration)
    #[arg(short, long)]
    pub audio_output_dir: Option<String>,

    /// Optional path to config.yaml file
    #[arg(long)]
    pub config: Option<String>,
}
