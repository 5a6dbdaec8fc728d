//! exiftract - ExifTool metadata extraction for file-analysis pipelines.
//!
//! Shells out to the external `exiftool` binary, classifies its exit status,
//! stdout and stderr into one of five outcomes, and on success maps the flat
//! key/value JSON metadata into a typed feature mapping with field renaming,
//! coercion, truncation and drop policy.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use exiftract::{extract_file, ExiftractConfig, OutcomeLabel};
//!
//! # async fn example() -> exiftract::Result<()> {
//! let config = ExiftractConfig::default();
//! let outcome = extract_file("sample.exe", &config).await?;
//!
//! match outcome.label {
//!     OutcomeLabel::Completed | OutcomeLabel::CompletedWithWarnings => {
//!         for (feature, values) in &outcome.features {
//!             println!("{feature}: {} value(s)", values.len());
//!         }
//!     }
//!     _ => println!("{:?}: {}", outcome.label, outcome.message.unwrap_or_default()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Outcomes
//!
//! - `COMPLETED` / `COMPLETED_WITH_WARNINGS` - features extracted; warnings
//!   mean one or more values were truncated.
//! - `OPT_OUT` - unknown file type, leading padding bytes, or over the size
//!   limit; the extractor does not apply.
//! - `MALFORMED` - the artifact itself is degenerate (all zeros, or one
//!   repeated byte per ExifTool's detection).
//! - `ERROR` - ExifTool failed in an unrecognized way; diagnostic text is
//!   carried verbatim.
//!
//! Failures of the machinery itself (spawn errors, timeout, undecodable
//! output, integer-coercion contract violations) surface as
//! [`ExiftractError`] instead of an outcome.

#![deny(unsafe_code)]

pub mod classify;
pub mod config;
pub mod error;
pub mod fields;
pub mod mapper;
pub mod runner;
pub mod scan;
pub mod types;

pub use config::ExiftractConfig;
pub use error::{ExiftractError, Result};
pub use mapper::GENERIC_FEATURE;
pub use runner::check_exiftool_available;
pub use types::{ExtractionOutcome, FeatureMap, FeatureValue, OutcomeLabel};

use std::path::{Path, PathBuf};

/// Message reported for inputs consisting solely of zero bytes.
const ZEROS_MESSAGE: &str = "Binary is full of zeros.";

/// RAII guard for automatic temporary file cleanup
struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Extract metadata from a file on disk.
///
/// Precondition checks (size gate, all-zeros scan) run before the tool is
/// invoked; the subprocess result is then classified and, on success, mapped
/// into features. Every invocation is self-contained: no state is shared
/// across calls and nothing is retried.
pub async fn extract_file(path: impl AsRef<Path>, config: &ExiftractConfig) -> Result<ExtractionOutcome> {
    let path = path.as_ref();
    config.validate()?;

    let size = tokio::fs::metadata(path).await?.len();
    if size > config.max_content_size {
        return Ok(ExtractionOutcome::opt_out(format!(
            "Content size {} bytes exceeds the {} byte limit",
            size, config.max_content_size
        )));
    }

    if scan::is_file_all_zeros(path).await? {
        return Ok(ExtractionOutcome::malformed(ZEROS_MESSAGE));
    }

    extract_checked(path, config).await
}

/// Extract metadata from an in-memory buffer.
///
/// The bytes are staged in a RAII-guarded temporary file for the duration of
/// the ExifTool run; the file is removed on every exit path.
pub async fn extract_bytes(bytes: &[u8], config: &ExiftractConfig) -> Result<ExtractionOutcome> {
    config.validate()?;

    if bytes.len() as u64 > config.max_content_size {
        return Ok(ExtractionOutcome::opt_out(format!(
            "Content size {} bytes exceeds the {} byte limit",
            bytes.len(),
            config.max_content_size
        )));
    }

    if scan::is_all_zeros(bytes) {
        return Ok(ExtractionOutcome::malformed(ZEROS_MESSAGE));
    }

    let temp_path = std::env::temp_dir().join(format!(
        "exiftract_{}_{}",
        std::process::id(),
        uuid::Uuid::new_v4()
    ));
    let _temp_guard = TempFile::new(temp_path.clone());
    tokio::fs::write(&temp_path, bytes).await?;

    extract_checked(&temp_path, config).await
}

/// Run the tool against a pre-checked path and classify the result.
async fn extract_checked(path: &Path, config: &ExiftractConfig) -> Result<ExtractionOutcome> {
    let output = runner::run_exiftool(path, config).await?;

    if !output.status.success() {
        return Ok(classify::classify_failure(&output.stdout, &output.stderr));
    }

    let stdout = String::from_utf8(output.stdout)
        .map_err(|e| ExiftractError::serialization(format!("ExifTool output is not valid UTF-8: {}", e)))?;

    let (features, truncated_field_names) = mapper::build_features(&stdout, config.max_value_length)?;

    if truncated_field_names.is_empty() {
        Ok(ExtractionOutcome::completed(features))
    } else {
        Ok(ExtractionOutcome::completed_with_warnings(
            features,
            format!(
                "Completed but the following fields were truncated {}",
                truncated_field_names.join(",")
            ),
        ))
    }
}

/// Synchronous wrapper around [`extract_file`].
///
/// Builds a current-thread runtime per call; do not use from inside an async
/// context.
pub fn extract_file_sync(path: impl AsRef<Path>, config: &ExiftractConfig) -> Result<ExtractionOutcome> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(extract_file(path, config))
}

/// Synchronous wrapper around [`extract_bytes`].
pub fn extract_bytes_sync(bytes: &[u8], config: &ExiftractConfig) -> Result<ExtractionOutcome> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(extract_bytes(bytes, config))
}
