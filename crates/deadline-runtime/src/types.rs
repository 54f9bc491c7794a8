//! Runtime types.

use serde::Serialize;

use deadline_records::AssignmentRecord;

/// Deterministic pipeline output for one input text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagPreview {
    /// Tagged blocks, ignore markup included.
    pub tagged: String,
    /// Prompt-ready text with ignore regions removed.
    pub cleaned: String,
}

/// Result of a full extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub records: Vec<AssignmentRecord>,
    #[serde(rename = "taggedText")]
    pub tagged_text: String,
    /// False when the cleaned text was empty and the model was skipped.
    #[serde(rename = "modelCalled")]
    pub model_called: bool,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}
