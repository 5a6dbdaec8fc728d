//! Field mapping and truncation engine.
//!
//! Takes ExifTool's successful JSON output (an array of flat key/value
//! objects, one per analyzed item) and builds the feature mapping: every
//! retained field lands in the generic `exif_metadata` bucket labeled with
//! its raw name, and fields present in [`MAPPED_FIELDS`] additionally
//! populate their canonical feature under the coercion rule of the table.

use crate::error::{ExiftractError, Result};
use crate::fields::{split_string_set, Coercion, IGNORED_FIELDS, IGNORED_FIELDS_WHEN_TOO_LONG, MAPPED_FIELDS};
use crate::types::{FeatureMap, FeatureValue};
use serde_json::Value;

/// Canonical name of the catch-all feature.
pub const GENERIC_FEATURE: &str = "exif_metadata";

/// Build the feature mapping from ExifTool JSON output.
///
/// Returns the features plus the list of raw field names whose values had to
/// be truncated; a non-empty list upgrades the run to
/// COMPLETED_WITH_WARNINGS at the call site.
///
/// All array elements are processed in sequence. Later duplicates of a
/// mapped field reassign its canonical feature; the generic bucket appends.
pub fn build_features(raw_json: &str, max_value_length: usize) -> Result<(FeatureMap, Vec<String>)> {
    let records: Vec<Value> = serde_json::from_str(raw_json.trim())?;

    let mut features = FeatureMap::new();
    let mut truncated_field_names: Vec<String> = Vec::new();

    for record in &records {
        let object = record.as_object().ok_or_else(|| {
            ExiftractError::serialization("ExifTool output array element is not a JSON object")
        })?;

        for (field, val) in object {
            // "(none)" and "" are ExifTool's empty sentinels; integer 0 is a
            // legitimate value and must pass.
            if matches!(val.as_str(), Some("(none)") | Some("")) {
                continue;
            }
            if IGNORED_FIELDS.contains(&field.as_str()) {
                continue;
            }

            // Mapping is not exclusive with the generic bucket below.
            if let Some(&(canonical, coercion)) = MAPPED_FIELDS.get(field.as_str()) {
                let coerced = coerce(field, val, coercion)?;
                features.insert(canonical.to_string(), coerced);
            }

            // Guard against nested structures or null; those never reach the
            // generic bucket.
            let Some(text) = stringify_scalar(val) else {
                continue;
            };

            // Only textual values are length-checked; numbers and booleans
            // pass through whole.
            let text = if val.is_string() && text.chars().count() > max_value_length {
                if IGNORED_FIELDS_WHEN_TOO_LONG.contains(&field.as_str()) {
                    continue;
                }
                truncated_field_names.push(field.clone());
                text.chars().take(max_value_length).collect()
            } else {
                text
            };

            features
                .entry(GENERIC_FEATURE.to_string())
                .or_default()
                .push(FeatureValue::labeled(text, field.clone()));
        }
    }

    Ok((features, truncated_field_names))
}

/// Apply one coercion rule to a raw value.
fn coerce(field: &str, val: &Value, coercion: Coercion) -> Result<Vec<FeatureValue>> {
    match coercion {
        Coercion::ToString => Ok(vec![FeatureValue::new(stringify_lossy(val))]),
        Coercion::ToInteger => {
            let parsed = parse_integer(val).ok_or_else(|| {
                ExiftractError::validation(format!(
                    "Field '{}' is mapped as an integer but ExifTool returned {}",
                    field, val
                ))
            })?;
            Ok(vec![FeatureValue::new(parsed.to_string())])
        }
        Coercion::ToStringSet => {
            let parts = split_string_set(&stringify_lossy(val));
            Ok(parts.into_iter().map(FeatureValue::new).collect())
        }
    }
}

/// Integer parse accepting JSON integers and integer-shaped strings.
/// Anything else (floats, free text) is a contract violation.
fn parse_integer(val: &Value) -> Option<i64> {
    match val {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Stringify a scalar value; `None` for null, arrays and objects.
fn stringify_scalar(val: &Value) -> Option<String> {
    match val {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Stringify any value; nested structures fall back to compact JSON. Only
/// used once a field is known to be in the mapping table.
fn stringify_lossy(val: &Value) -> String {
    stringify_scalar(val).unwrap_or_else(|| val.to_string())
}
