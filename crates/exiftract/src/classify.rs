//! Outcome classification for failed ExifTool runs.
//!
//! ExifTool has no machine-readable error channel: it conflates "this format
//! is not supported" and "this content is not structured at all" with every
//! other non-zero exit, and whether diagnostics land on stdout or stderr is
//! inconsistent. Classification therefore sniffs the human-readable text.
//! The matching semantics here are load-bearing: the unknown-type marker is
//! searched in stdout only, the binary-padding patterns are anchored at the
//! start of the effective error message, and both are case-sensitive.
//! Loosening any of these invites regressions whenever upstream phrasing
//! shifts.

use crate::types::ExtractionOutcome;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Marker ExifTool prints to stdout for formats it does not recognize.
const UNKNOWN_FILE_TYPE_MARKER: &str = "Unknown file type";

/// Prefix of ExifTool's "the whole file is one repeated byte" diagnostic.
const ENTIRE_FILE_BINARY_PREFIX: &str = "Entire file is binary";

/// Files whose leading bytes are all zeros or all 0xff are padding, not
/// analyzable content. Kept character-for-character from the upstream
/// diagnostic shape, unescaped dots included.
static BINARY_PREFIX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^First [0-9].* of file is binary (zeros|0x..'s)").expect("binary prefix pattern is valid")
});

/// Classify a non-zero ExifTool exit into OPT_OUT, MALFORMED or ERROR.
///
/// Priority order:
/// 1. stdout containing the unknown-type marker wins outright, regardless of
///    stderr content;
/// 2. otherwise the effective error message (stderr, with a best-effort
///    stdout JSON fallback) is sniffed for the malformed / padding patterns;
/// 3. anything unrecognized is a hard processing error carrying the message
///    verbatim.
pub fn classify_failure(stdout: &[u8], stderr: &[u8]) -> ExtractionOutcome {
    if contains_subslice(stdout, UNKNOWN_FILE_TYPE_MARKER.as_bytes()) {
        return ExtractionOutcome::opt_out(UNKNOWN_FILE_TYPE_MARKER);
    }

    let err_msg = effective_error_message(stdout, stderr);

    if err_msg.starts_with(ENTIRE_FILE_BINARY_PREFIX) {
        return ExtractionOutcome::malformed(err_msg);
    }
    if BINARY_PREFIX_PATTERN.is_match(&err_msg) {
        return ExtractionOutcome::opt_out(err_msg);
    }

    tracing::debug!(error_text = %err_msg, "unrecognized exiftool failure");
    ExtractionOutcome::error(err_msg)
}

/// Compute the effective error message for a failed run.
///
/// stderr is authoritative. When stderr is empty, stdout is adopted as the
/// message and, best-effort, reinterpreted as ExifTool's JSON array of
/// per-item error objects; the non-empty items' "Error" strings joined with
/// newlines replace it. Recovery failures of any kind are swallowed and the
/// adopted text kept. The blast radius of "ignore this error" is exactly
/// this one step.
fn effective_error_message(stdout: &[u8], stderr: &[u8]) -> String {
    let err_msg = String::from_utf8_lossy(stderr).into_owned();
    if !err_msg.is_empty() {
        return err_msg;
    }

    let err_msg = String::from_utf8_lossy(stdout).into_owned();
    match recover_json_errors(&err_msg) {
        Some(recovered) => recovered,
        None => err_msg,
    }
}

/// Extract "Error" strings from a JSON array of per-item error objects.
///
/// `None` means recovery did not apply: unparseable JSON, a non-empty item
/// without a string "Error" key, or no messages at all.
fn recover_json_errors(text: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(text.trim()).ok()?;
    let items = parsed.as_array()?;

    let mut messages = Vec::new();
    for item in items {
        // Empty items are skipped silently; anything else must carry an
        // "Error" string or the whole recovery is abandoned.
        match item {
            Value::Object(map) if map.is_empty() => continue,
            Value::Object(map) => messages.push(map.get("Error")?.as_str()?.to_string()),
            Value::Array(arr) if arr.is_empty() => continue,
            Value::String(s) if s.is_empty() => continue,
            _ => return None,
        }
    }

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("\n"))
    }
}

/// Byte-level substring search; the marker check must not depend on stdout
/// being valid UTF-8.
fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutcomeLabel;

    #[test]
    fn test_unknown_file_type_marker_in_stdout_wins() {
        let outcome = classify_failure(
            b"Error: Unknown file type - /tmp/blob\n",
            b"some unrelated stderr noise",
        );
        assert_eq!(outcome.label, OutcomeLabel::OptOut);
        assert_eq!(outcome.message.as_deref(), Some("Unknown file type"));
    }

    #[test]
    fn test_unknown_file_type_marker_not_checked_in_stderr() {
        let outcome = classify_failure(b"", b"Unknown file type");
        // The marker in stderr does not trigger the opt-out branch; the text
        // becomes the effective error message instead.
        assert_eq!(outcome.label, OutcomeLabel::Error);
        assert_eq!(outcome.message.as_deref(), Some("Unknown file type"));
    }

    #[test]
    fn test_entire_file_binary_is_malformed() {
        let outcome = classify_failure(b"", b"Entire file is binary 0xff's");
        assert_eq!(outcome.label, OutcomeLabel::Malformed);
        assert_eq!(outcome.message.as_deref(), Some("Entire file is binary 0xff's"));
    }

    #[test]
    fn test_binary_zeros_prefix_is_opt_out() {
        let outcome = classify_failure(b"", b"First 2048 bytes of file is binary zeros");
        assert_eq!(outcome.label, OutcomeLabel::OptOut);
        assert_eq!(
            outcome.message.as_deref(),
            Some("First 2048 bytes of file is binary zeros")
        );
    }

    #[test]
    fn test_binary_ff_prefix_is_opt_out() {
        let outcome = classify_failure(b"", b"First 512 bytes of file is binary 0xff's");
        assert_eq!(outcome.label, OutcomeLabel::OptOut);
    }

    #[test]
    fn test_binary_prefix_pattern_is_anchored() {
        let outcome = classify_failure(b"", b"note: First 512 bytes of file is binary zeros");
        assert_eq!(outcome.label, OutcomeLabel::Error);
    }

    #[test]
    fn test_binary_prefix_pattern_is_case_sensitive() {
        let outcome = classify_failure(b"", b"first 512 bytes of file is binary zeros");
        assert_eq!(outcome.label, OutcomeLabel::Error);
    }

    #[test]
    fn test_json_error_recovery_from_stdout() {
        let outcome = classify_failure(br#"[{"Error":"bad magic"}]"#, b"");
        assert_eq!(outcome.label, OutcomeLabel::Error);
        assert_eq!(outcome.message.as_deref(), Some("bad magic"));
    }

    #[test]
    fn test_json_error_recovery_joins_and_skips_empty_items() {
        let outcome = classify_failure(br#"[{"Error":"first"}, {}, {"Error":"second"}]"#, b"");
        assert_eq!(outcome.message.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_json_recovery_feeds_pattern_sniffing() {
        let outcome = classify_failure(br#"[{"Error":"Entire file is binary zeros"}]"#, b"");
        assert_eq!(outcome.label, OutcomeLabel::Malformed);
    }

    #[test]
    fn test_failed_recovery_keeps_stdout_text() {
        let outcome = classify_failure(b"plain diagnostic text", b"");
        assert_eq!(outcome.label, OutcomeLabel::Error);
        assert_eq!(outcome.message.as_deref(), Some("plain diagnostic text"));
    }

    #[test]
    fn test_recovery_abandoned_on_item_without_error_key() {
        let outcome = classify_failure(br#"[{"Warning":"odd"}]"#, b"");
        assert_eq!(outcome.label, OutcomeLabel::Error);
        assert_eq!(outcome.message.as_deref(), Some(r#"[{"Warning":"odd"}]"#));
    }

    #[test]
    fn test_stderr_takes_priority_over_stdout_recovery() {
        let outcome = classify_failure(br#"[{"Error":"from stdout"}]"#, b"from stderr");
        assert_eq!(outcome.message.as_deref(), Some("from stderr"));
    }

    #[test]
    fn test_everything_empty_is_error_with_empty_message() {
        let outcome = classify_failure(b"", b"");
        assert_eq!(outcome.label, OutcomeLabel::Error);
        assert_eq!(outcome.message.as_deref(), Some(""));
    }

    #[test]
    fn test_recover_json_errors_rejects_non_array() {
        assert!(recover_json_errors(r#"{"Error":"x"}"#).is_none());
        assert!(recover_json_errors("[1, 2]").is_none());
        assert!(recover_json_errors("[]").is_none());
    }
}
