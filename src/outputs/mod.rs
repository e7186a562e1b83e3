//! Output generation modules for JSON and Markdown files.
//!
//! This module contains submodules responsible for writing a finished report
//! to its output formats:
//!
//! # Submodules
//!
//! - [`json`]: Writes `NewsReport` data to JSON files for API consumption
//! - [`markdown`]: Renders a `NewsReport` as Markdown for reading
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── acme-corp.json
//!
//! markdown_output_dir/
//! └── 2025-05-06_acme-corp.md
//! ```

pub mod json;
pub mod markdown;
