//! JSON output generation.
//!
//! This module serializes a finished [`NewsReport`] to JSON for consumption
//! by external clients.
//!
//! # Output Structure
//!
//! Files are organized by run date, one file per company:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── tesla.json
//!     └── acme-corp.json
//! ```

use crate::models::NewsReport;
use crate::utils::slugify_title;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`NewsReport`] to a JSON file with a date-based directory structure.
///
/// Creates the necessary directory structure and writes the serialized
/// report as JSON. The file path is determined by the report's local date
/// and a slug of the company name.
///
/// # Output Path
///
/// The file is written to: `{json_output_dir}/{local_date}/{company_slug}.json`
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &NewsReport,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string(report)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        report.local_date
    );

    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!(
        "{}/{}.json",
        full_json_dir,
        slugify_title(&report.company)
    );

    info!(path = %output_json_filename, "Writing JSON");
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote JSON report file");

    Ok(output_json_filename)
}
