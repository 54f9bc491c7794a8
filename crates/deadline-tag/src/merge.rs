//! Merge recognizer DATE/TIME spans into due candidates.

use tracing::debug;

use deadline_infer::{DateTimeParser, ParsedDateTime, Span, SpanLabel};

use crate::markup::{due_markup, TaggedRegions};
use crate::replace::Replacement;

/// A resolved date (optionally with time) proposed as a due marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueCandidate {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub parsed: ParsedDateTime,
}

impl DueCandidate {
    /// Resolve `text[start..end]`. None when the parser yields no date.
    pub fn resolve(text: &str, start: usize, end: usize, parser: &dyn DateTimeParser) -> Option<Self> {
        let slice = text.get(start..end)?;
        let parsed = parser.parse(slice);
        if parsed.date.is_none() {
            debug!("Dropping unresolvable span {:?}", slice);
            return None;
        }
        Some(Self {
            start,
            end,
            text: slice.to_string(),
            parsed,
        })
    }

    /// Edit replacing the candidate with its `<DUE>` markup.
    pub fn to_replacement(&self) -> Option<Replacement> {
        due_markup(&self.parsed).map(|markup| Replacement::new(self.start, self.end, markup))
    }
}

/// Turn recognizer spans over `text` into sorted, non-overlapping due candidates.
///
/// Spans touching a tagged region (title, ignore, existing due) are dropped.
/// A DATE span immediately followed in recognizer order by a TIME span is
/// merged into one candidate `[date.start, time.end)`. DUE spans are taken
/// as they are.
pub fn merge_entities(
    text: &str,
    spans: &[Span],
    regions: &TaggedRegions,
    parser: &dyn DateTimeParser,
) -> Vec<DueCandidate> {
    let kept: Vec<&Span> = spans
        .iter()
        .filter(|s| matches!(s.label, SpanLabel::Date | SpanLabel::Time | SpanLabel::Due))
        .filter(|s| {
            let covered = regions.is_covered(s.start, s.end);
            if covered {
                debug!("Skipping {} span {:?} inside tagged region", s.label.label(), s.text);
            }
            !covered
        })
        .collect();

    let mut ranges = Vec::with_capacity(kept.len());
    let mut i = 0;
    while i < kept.len() {
        let span = kept[i];
        if let Some(next) = kept.get(i + 1) {
            let mergeable = span.label == SpanLabel::Date
                && next.label == SpanLabel::Time
                && next.start >= span.end
                && !regions.is_covered(span.start, next.end);
            if mergeable {
                ranges.push((span.start, next.end));
                i += 2;
                continue;
            }
        }
        ranges.push((span.start, span.end));
        i += 1;
    }

    let mut candidates: Vec<DueCandidate> = ranges
        .into_iter()
        .filter_map(|(start, end)| DueCandidate::resolve(text, start, end, parser))
        .collect();

    // Sort by position, longest first; the recognizer may report duplicates
    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut filtered = Vec::with_capacity(candidates.len());
    let mut last_end = 0;
    for candidate in candidates {
        if candidate.start >= last_end {
            last_end = candidate.end;
            filtered.push(candidate);
        }
    }
    filtered
}
