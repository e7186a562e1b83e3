//! Spoken-summary generation for finished reports.
//!
//! The narrator turns a [`NewsReport`](crate::models::NewsReport) into an
//! audio file in three steps, each in its own submodule:
//!
//! 1. [`script`]: translate the report's dynamic pieces and splice them
//!    into the fixed Hindi narration frame
//! 2. [`tts`]: chunk the script and synthesize each chunk to MP3
//! 3. [`remote`]: the retrying HTTP calls both steps run on
//!
//! Narration is strictly additive: it runs after the report files are on
//! disk, and a narration failure never invalidates them.

pub mod remote;
pub mod script;
pub mod tts;

use crate::config::NarratorConfig;
use crate::models::NewsReport;
use crate::narrator::remote::{RetryCall, TranslateCall, BASE_DELAY, MAX_RETRIES};
use crate::utils::slugify_title;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Narrate a report and write the audio under `audio_dir`.
///
/// The file lands at `{audio_dir}/{local_date}/{company_slug}.mp3`; the
/// returned string is that path.
#[instrument(level = "info", skip_all, fields(company = %report.company))]
pub async fn narrate_report(
    client: &reqwest::Client,
    config: &NarratorConfig,
    report: &NewsReport,
    audio_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let translate = TranslateCall {
        client,
        endpoint: &config.translate_endpoint,
        target_lang: &config.language,
    };
    let translator = RetryCall::new(translate, MAX_RETRIES, BASE_DELAY);

    let narration = script::build_script(&translator, report).await?;
    info!(
        chars = narration.chars().count(),
        "Built narration script"
    );

    let dir = format!("{}/{}", audio_dir.trim_end_matches('/'), report.local_date);
    fs::create_dir_all(&dir).await?;
    let path = format!("{}/{}.mp3", dir, slugify_title(&report.company));

    tts::synthesize_to_file(
        client,
        &config.tts_endpoint,
        &config.language,
        &narration,
        &path,
    )
    .await?;

    Ok(path)
}
