//! ExifTool subprocess invocation.
//!
//! Locates the `exiftool` executable (explicit config path, then the
//! `EXIFTRACT_EXIFTOOL_PATH` environment variable, then a `PATH` scan),
//! runs it with JSON output requested, and captures exit status, stdout and
//! stderr under the configured timeout.
//!
//! # System requirement
//!
//! ExifTool must be installed:
//! - **macOS**: `brew install exiftool`
//! - **Linux**: `apt install libimage-exiftool-perl` or `dnf install perl-Image-ExifTool`
//! - **Windows**: `winget install OliverBetz.ExifTool`

use crate::config::ExiftractConfig;
use crate::error::{ExiftractError, Result};
use std::collections::HashSet;
use std::env;
use std::fs as std_fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

fn exiftool_install_message() -> String {
    "ExifTool is required for metadata extraction. \
Install: macOS: 'brew install exiftool', \
Linux: 'apt install libimage-exiftool-perl', \
Windows: 'winget install OliverBetz.ExifTool'. \
If ExifTool is installed in a custom location, set the EXIFTRACT_EXIFTOOL_PATH environment variable to the executable."
        .to_string()
}

fn exiftool_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    let mut push_candidate = |path: PathBuf| {
        if seen.insert(path.clone()) {
            candidates.push(path);
        }
    };

    if let Some(path) = configured {
        push_candidate(path.to_path_buf());
    }

    if let Some(value) = env::var_os("EXIFTRACT_EXIFTOOL_PATH").filter(|v| !v.is_empty()) {
        push_candidate(PathBuf::from(value));
    }

    if let Some(path_env) = env::var_os("PATH") {
        for dir in env::split_paths(&path_env) {
            push_candidate(dir.join("exiftool"));
            push_candidate(dir.join("exiftool.exe"));
        }
    }

    candidates
}

fn locate_exiftool_binary(configured: Option<&Path>) -> Result<PathBuf> {
    for candidate in exiftool_candidates(configured) {
        if candidate.exists() {
            if let Ok(metadata) = std_fs::metadata(&candidate) {
                if metadata.is_file() {
                    return Ok(candidate);
                }
            }
        }
    }

    Err(ExiftractError::MissingDependency(exiftool_install_message()))
}

/// Check that ExifTool is present and responds to `-ver`.
pub async fn check_exiftool_available() -> Result<PathBuf> {
    let exiftool_path = locate_exiftool_binary(None)?;

    let result = Command::new(&exiftool_path).arg("-ver").output().await;

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            tracing::debug!(version = %version.trim(), "exiftool available");
            Ok(exiftool_path)
        }
        Ok(_) => Err(ExiftractError::MissingDependency(format!(
            "ExifTool executable '{}' responded with a failure when checking '-ver'. \
Please reinstall ExifTool.",
            exiftool_path.display()
        ))),
        Err(err) => Err(ExiftractError::MissingDependency(format!(
            "ExifTool executable '{}' could not be executed: {}. {help}",
            exiftool_path.display(),
            err,
            help = exiftool_install_message()
        ))),
    }
}

/// Run `exiftool -json <path>` and capture the raw output.
///
/// The child environment forces `TZ=UTC` so timestamp fields the tool
/// renders in local time come out normalized; fields carrying their own
/// explicit offset are untouched by this (ExifTool preserves embedded
/// offsets regardless of `TZ`). On timeout the child is killed and the run
/// fails hard; timeouts are never retried here.
pub async fn run_exiftool(input_path: &Path, config: &ExiftractConfig) -> Result<Output> {
    let exiftool_path = locate_exiftool_binary(config.exiftool_path.as_deref())?;

    tracing::debug!(
        exiftool = %exiftool_path.display(),
        input = %input_path.display(),
        timeout_seconds = config.timeout_seconds,
        "invoking exiftool"
    );

    let child = Command::new(&exiftool_path)
        .arg("-json")
        .arg(input_path)
        .env("TZ", "UTC")
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            ExiftractError::subprocess_with_source(
                format!("Failed to execute ExifTool at '{}'", exiftool_path.display()),
                e,
            )
        })?;

    let output = match timeout(Duration::from_secs(config.timeout_seconds), child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(ExiftractError::subprocess_with_source(
                "Failed to wait for ExifTool",
                e,
            ));
        }
        Err(_) => {
            // wait_with_output was cancelled; kill_on_drop reaps the child
            tracing::warn!(
                input = %input_path.display(),
                timeout_seconds = config.timeout_seconds,
                "exiftool invocation timed out"
            );
            return Err(ExiftractError::Timeout {
                timeout_seconds: config.timeout_seconds,
            });
        }
    };

    Ok(output)
}
