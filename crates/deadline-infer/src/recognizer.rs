//! Entity recognizer trait and span types.

use serde::{Deserialize, Serialize};

use deadline_core::Result;

/// Label attached to a detected span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpanLabel {
    Date,
    Time,
    /// A full date (optionally with time) the recognizer already reads as
    /// one deadline expression. Never merged with neighbouring spans.
    Due,
}

impl SpanLabel {
    pub fn label(&self) -> &'static str {
        match self {
            SpanLabel::Date => "DATE",
            SpanLabel::Time => "TIME",
            SpanLabel::Due => "DUE",
        }
    }
}

/// A labeled half-open byte range `[start, end)` over a specific text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub label: SpanLabel,
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Build a span over `source[start..end]`.
    ///
    /// Returns None when the range is empty, out of bounds, or not on char boundaries.
    pub fn over(source: &str, label: SpanLabel, start: usize, end: usize) -> Option<Self> {
        if start >= end || end > source.len() {
            return None;
        }
        let text = source.get(start..end)?;
        Some(Self {
            text: text.to_string(),
            label,
            start,
            end,
        })
    }
}

/// Trait for DATE/TIME entity recognizers.
///
/// Spans are returned in text order with byte offsets into `text`.
pub trait EntityRecognizer: Send + Sync {
    /// Detect DATE, TIME and DUE spans in `text`.
    fn recognize(&self, text: &str) -> Result<Vec<Span>>;

    /// Check if the recognizer is backed by a real model or pattern set.
    fn is_available(&self) -> bool;
}

/// Recognizer that never finds anything.
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<Span>> {
        Ok(Vec::new())
    }

    fn is_available(&self) -> bool {
        false
    }
}
