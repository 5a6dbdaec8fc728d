//! Core types for extraction outcomes and feature mappings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Terminal label of one extraction run.
///
/// Exactly one label applies per artifact:
///
/// - `Completed` - metadata extracted, nothing lost.
/// - `CompletedWithWarnings` - metadata extracted but one or more field
///   values were truncated to fit the configured maximum length.
/// - `OptOut` - the artifact is not something this extractor applies to
///   (unknown file type, or mostly padding bytes at the start). Not an error.
/// - `Malformed` - the artifact itself is degenerate (all zeros, or a single
///   repeated byte value per ExifTool's own detection). Terminal, and distinct
///   from a processing error so consumers can tell "nothing to extract" from
///   "extraction failed".
/// - `Error` - ExifTool failed in a way we do not recognize; the diagnostic
///   text is surfaced verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeLabel {
    Completed,
    CompletedWithWarnings,
    OptOut,
    Malformed,
    Error,
}

/// A single feature value with an optional origin label.
///
/// For the generic `exif_metadata` bucket the label is the raw ExifTool field
/// name the value came from. Specifically mapped features carry no label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FeatureValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }
}

/// Mapping from canonical feature name to an ordered list of values.
///
/// A `BTreeMap` keeps serialization deterministic; value order within a
/// feature is insertion order.
pub type FeatureMap = BTreeMap<String, Vec<FeatureValue>>;

/// The outcome record of one extraction run.
///
/// Built fresh per invocation; nothing here is shared across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub label: OutcomeLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "FeatureMap::is_empty")]
    pub features: FeatureMap,
}

impl ExtractionOutcome {
    pub fn completed(features: FeatureMap) -> Self {
        Self {
            label: OutcomeLabel::Completed,
            message: None,
            features,
        }
    }

    pub fn completed_with_warnings(features: FeatureMap, message: impl Into<String>) -> Self {
        Self {
            label: OutcomeLabel::CompletedWithWarnings,
            message: Some(message.into()),
            features,
        }
    }

    pub fn opt_out(message: impl Into<String>) -> Self {
        Self {
            label: OutcomeLabel::OptOut,
            message: Some(message.into()),
            features: FeatureMap::new(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            label: OutcomeLabel::Malformed,
            message: Some(message.into()),
            features: FeatureMap::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            label: OutcomeLabel::Error,
            message: Some(message.into()),
            features: FeatureMap::new(),
        }
    }

    /// True for `Completed` and `CompletedWithWarnings`.
    pub fn is_success(&self) -> bool {
        matches!(
            self.label,
            OutcomeLabel::Completed | OutcomeLabel::CompletedWithWarnings
        )
    }
}
