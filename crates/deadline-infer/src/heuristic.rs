//! Regex-driven DATE/TIME recognizer.
//!
//! Emits spans the way a statistical NER does for course listings:
//! "Sep 8 at 11:59pm" yields a DATE span for "Sep 8" and a separate TIME
//! span for "11:59pm". Merging them is the tagging pipeline's job.

use once_cell::sync::Lazy;
use regex::Regex;

use deadline_core::Result;

use crate::datetime::month_number;
use crate::recognizer::{EntityRecognizer, Span, SpanLabel};

static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+\d{1,2}(?:st|nd|rd|th)?\b(?:,?\s+\d{4}\b)?").unwrap()
});
static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap());
static NUMERIC_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b").unwrap());
static RELATIVE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:today|tonight|tomorrow)\b").unwrap());

static CLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\d{1,2}:\d{2}(?:\s*[ap]\.?m\b)?").unwrap());
static HOUR_TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b\d{1,2}\s*[ap]\.?m\b").unwrap());
static WORD_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:noon|midnight)\b").unwrap());

/// Recognizer using compiled DATE/TIME patterns.
pub struct HeuristicRecognizer {
    patterns: Vec<(SpanLabel, &'static Regex)>,
}

impl HeuristicRecognizer {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                (SpanLabel::Date, &ISO_DATE_RE),
                (SpanLabel::Date, &NUMERIC_DATE_RE),
                (SpanLabel::Date, &RELATIVE_DATE_RE),
                (SpanLabel::Time, &CLOCK_TIME_RE),
                (SpanLabel::Time, &HOUR_TIME_RE),
                (SpanLabel::Time, &WORD_TIME_RE),
            ],
        }
    }

    /// Detect spans, sorted by position with overlaps removed.
    pub fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();

        // Month-name dates need the leading word checked against real month names
        for cap in MONTH_DATE_RE.captures_iter(text) {
            let (Some(whole), Some(word)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            if month_number(word.as_str()).is_some() {
                spans.extend(Span::over(text, SpanLabel::Date, whole.start(), whole.end()));
            }
        }

        for (label, regex) in &self.patterns {
            for m in regex.find_iter(text) {
                spans.extend(Span::over(text, *label, m.start(), m.end()));
            }
        }

        // Sort by position, longest match first for overlapping
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut filtered = Vec::new();
        let mut last_end = 0;
        for span in spans {
            if span.start >= last_end {
                last_end = span.end;
                filtered.push(span);
            }
        }
        filtered
    }
}

impl Default for HeuristicRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Span>> {
        Ok(self.detect(text))
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(spans: &[Span]) -> Vec<(SpanLabel, &str)> {
        spans.iter().map(|s| (s.label, s.text.as_str())).collect()
    }

    #[test]
    fn test_date_and_time_are_separate_spans() {
        let spans = HeuristicRecognizer::new().detect("Due Sep 8 at 11:59pm Sep 8 at 11:59pm");
        assert_eq!(
            labels(&spans),
            vec![
                (SpanLabel::Date, "Sep 8"),
                (SpanLabel::Time, "11:59pm"),
                (SpanLabel::Date, "Sep 8"),
                (SpanLabel::Time, "11:59pm"),
            ]
        );
        assert_eq!(spans[0].start, 4);
        assert_eq!(spans[0].end, 9);
    }

    #[test]
    fn test_hour_only_time() {
        let spans = HeuristicRecognizer::new().detect("Not available until Sep 3 at 12pm");
        assert_eq!(
            labels(&spans),
            vec![(SpanLabel::Date, "Sep 3"), (SpanLabel::Time, "12pm")]
        );
    }

    #[test]
    fn test_ignores_non_month_words() {
        let spans = HeuristicRecognizer::new().detect("-/20 ptsNo submission. Chapter 5 review");
        assert!(spans.is_empty());
    }

    #[test]
    fn test_iso_date() {
        let spans = HeuristicRecognizer::new().detect("due 2024-10-07 23:59");
        assert_eq!(
            labels(&spans),
            vec![(SpanLabel::Date, "2024-10-07"), (SpanLabel::Time, "23:59")]
        );
    }
}
