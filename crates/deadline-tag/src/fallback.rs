//! Regex safety net for month/day expressions the recognizer missed.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use deadline_core::Result;
use deadline_infer::DateTimeParser;

use crate::block::Block;
use crate::markup::RegionKind;
use crate::merge::DueCandidate;
use crate::replace::Replacement;

/// Abbreviated month, day number, optional "at H[:MM] am|pm".
static FALLBACK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.? \d{1,2}(?: at \d{1,2}(?::\d{2})?\s?[ap]m)?\b",
    )
    .unwrap()
});

/// Matches in `block` outside every tagged region, resolved through `parser`.
pub fn fallback_candidates(block: &Block, parser: &dyn DateTimeParser) -> Vec<DueCandidate> {
    FALLBACK_RE
        .find_iter(block.text())
        .filter(|m| !block.regions().is_covered(m.start(), m.end()))
        .filter_map(|m| DueCandidate::resolve(block.text(), m.start(), m.end(), parser))
        .collect()
}

/// Tag fallback matches with `<DUE>` markup. Returns how many were tagged.
pub fn tag_fallback(block: &mut Block, parser: &dyn DateTimeParser) -> Result<usize> {
    let edits: Vec<Replacement> = fallback_candidates(block, parser)
        .iter()
        .filter_map(DueCandidate::to_replacement)
        .collect();
    if !edits.is_empty() {
        debug!("Regex fallback tagged {} span(s)", edits.len());
    }
    block.rewrite(&edits, Some(RegionKind::Due))?;
    Ok(edits.len())
}
