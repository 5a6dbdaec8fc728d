//! Static field tables driving the mapping engine.
//!
//! These tables are process-wide immutable constants: built once on first
//! use, never mutated, no synchronization needed beyond `Lazy`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// How a raw ExifTool value is coerced into a mapped feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Store the value as its string form.
    ToString,
    /// Parse the value as an integer; failure is a contract violation by the
    /// tool and fails the whole extraction.
    ToInteger,
    /// Split a comma-separated value into trimmed, deduplicated strings.
    ToStringSet,
}

/// Raw ExifTool field name to (canonical feature name, coercion rule).
///
/// Canonical names are stable identifiers used as feature keys downstream;
/// the PE-prefixed ones exist so other analysis stages can correlate on them.
const MAPPED_FIELD_TABLE: &[(&str, &str, Coercion)] = &[
    ("MIMEType", "mime", Coercion::ToString),
    ("MachineType", "pe_machine", Coercion::ToString),
    ("Subsystem", "pe_subsystem", Coercion::ToString),
    ("SubsystemVersion", "pe_subsystem_version", Coercion::ToString),
    ("CodeSize", "pe_code_size", Coercion::ToInteger),
    ("LinkerVersion", "pe_linker_version", Coercion::ToString),
    ("InitializedDataSize", "pe_init_data_size", Coercion::ToInteger),
    ("UninitializedDataSize", "pe_uninit_data_size", Coercion::ToInteger),
    ("OSVersion", "pe_os_version", Coercion::ToString),
    ("ImageVersion", "pe_image_version", Coercion::ToString),
    ("ImageFileCharacteristics", "pe_characteristics", Coercion::ToStringSet),
    ("CompanyName", "pe_publisher", Coercion::ToString),
    ("Comments", "pe_comments", Coercion::ToString),
    ("LegalCopyright", "pe_copyright", Coercion::ToString),
    ("FileDescription", "pe_description", Coercion::ToString),
    // FileVersionNumber/ProductVersionNumber come from the fixed VERSIONINFO
    // block, not the strings block
    ("FileVersionNumber", "pe_file_version", Coercion::ToString),
    ("InternalName", "pe_internal_name", Coercion::ToString),
    ("OriginalFileName", "pe_original_name", Coercion::ToString),
    ("ProductName", "pe_product_name", Coercion::ToString),
    ("ProductVersionNumber", "pe_product_version", Coercion::ToString),
];

/// Lookup map over [`MAPPED_FIELD_TABLE`].
pub static MAPPED_FIELDS: Lazy<HashMap<&'static str, (&'static str, Coercion)>> = Lazy::new(|| {
    MAPPED_FIELD_TABLE
        .iter()
        .map(|&(raw, canonical, coercion)| (raw, (canonical, coercion)))
        .collect()
});

/// Redundant fields and fields derived from the filesystem rather than the
/// content; always dropped.
pub const IGNORED_FIELDS: &[&str] = &[
    "SourceFile",
    "ExifToolVersion",
    "FileName",
    "Directory",
    "FileSize",
    "FileModifyDate",
    "FileAccessDate",
    "FileInodeChangeDate",
    "FilePermissions",
];

/// Fields dropped silently (rather than truncated and flagged) when their
/// value exceeds the configured maximum length.
pub const IGNORED_FIELDS_WHEN_TOO_LONG: &[&str] = &["Mappings", "Comment"];

/// Split a comma-separated value into trimmed, non-empty, deduplicated
/// strings, preserving first-seen order.
pub fn split_string_set(value: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !seen.iter().any(|s| s == part) {
            seen.push(part.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_fields_unique_raw_names() {
        // Every raw field name appears at most once
        assert_eq!(MAPPED_FIELDS.len(), MAPPED_FIELD_TABLE.len());
    }

    #[test]
    fn test_mapped_fields_lookup() {
        assert_eq!(MAPPED_FIELDS.get("MIMEType"), Some(&("mime", Coercion::ToString)));
        assert_eq!(
            MAPPED_FIELDS.get("CodeSize"),
            Some(&("pe_code_size", Coercion::ToInteger))
        );
        assert_eq!(
            MAPPED_FIELDS.get("ImageFileCharacteristics"),
            Some(&("pe_characteristics", Coercion::ToStringSet))
        );
        assert!(MAPPED_FIELDS.get("FileType").is_none());
    }

    #[test]
    fn test_ignored_fields_cover_filesystem_metadata() {
        for field in ["SourceFile", "FileSize", "FileModifyDate", "ExifToolVersion"] {
            assert!(IGNORED_FIELDS.contains(&field));
        }
    }

    #[test]
    fn test_split_string_set_trims_and_drops_empties() {
        assert_eq!(
            split_string_set("No relocs, Executable, 32-bit"),
            vec!["No relocs", "Executable", "32-bit"]
        );
        assert_eq!(split_string_set(" a ,, b ,"), vec!["a", "b"]);
        assert!(split_string_set("").is_empty());
        assert!(split_string_set(" , ,").is_empty());
    }

    #[test]
    fn test_split_string_set_dedupes_preserving_order() {
        assert_eq!(split_string_set("b, a, b, c, a"), vec!["b", "a", "c"]);
    }
}
