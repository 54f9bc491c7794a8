//! Keep only the due marker that follows the "due" keyword.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use deadline_core::Result;

use crate::block::Block;
use crate::markup::RegionKind;
use crate::replace::Replacement;

static DUE_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bdue\b").unwrap());

/// Byte offset just past the first "due" keyword outside tagged regions.
pub fn due_keyword_end(block: &Block) -> Option<usize> {
    DUE_KEYWORD_RE
        .find_iter(block.text())
        .find(|m| !block.regions().is_covered(m.start(), m.end()))
        .map(|m| m.end())
}

/// Remove due markers before the keyword and all but the first after it.
///
/// The keyword is the first "due" outside every tagged region, so a "due"
/// inside the title or an ignored line never anchors the choice. In
/// "Homework due Friday" / "Opens Sep 2" / "Due Sep 16" the anchor is the
/// last line and Sep 16 is kept. A block without the keyword is left
/// untouched.
pub fn dedupe_due(block: &mut Block) -> Result<()> {
    let Some(keyword_end) = due_keyword_end(block) else {
        return Ok(());
    };

    let mut kept_one = false;
    let mut edits = Vec::new();
    for region in block.regions().of_kind(RegionKind::Due) {
        if region.start >= keyword_end && !kept_one {
            kept_one = true;
            continue;
        }
        edits.push(Replacement::new(region.start, region.end, ""));
    }

    if !edits.is_empty() {
        debug!("Removing {} redundant due marker(s)", edits.len());
    }
    block.rewrite(&edits, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::tag_fallback;
    use crate::lines::classify_lines;
    use chrono::NaiveDate;
    use deadline_infer::ChronoDateParser;

    fn tagged(raw: &str) -> Block {
        let parser = ChronoDateParser::with_reference(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        let mut block = classify_lines(raw).unwrap();
        tag_fallback(&mut block, &parser).unwrap();
        block
    }

    #[test]
    fn test_keeps_first_marker_after_keyword() {
        let mut block = tagged("Readme\nDue Sep 16 at 11:59pm Sep 16 at 11:59pm");
        assert_eq!(block.regions().of_kind(RegionKind::Due).count(), 2);

        dedupe_due(&mut block).unwrap();
        let done = block.finish();
        assert_eq!(
            done.due_markers(),
            vec!["<DUE><DATE>2024-09-16</DATE> <TIME>23:59</TIME></DUE>"]
        );
        assert!(done
            .text()
            .ends_with("Due <DUE><DATE>2024-09-16</DATE> <TIME>23:59</TIME></DUE> "));
    }

    #[test]
    fn test_markers_before_keyword_are_removed() {
        let mut block = tagged("Readme\nOpens Sep 2\nDue Sep 16");
        dedupe_due(&mut block).unwrap();
        let done = block.finish();
        assert_eq!(done.due_markers(), vec!["<DUE><DATE>2024-09-16</DATE></DUE>"]);
        assert!(done.text().contains("Opens \n"));
    }

    #[test]
    fn test_no_keyword_leaves_block_unchanged() {
        let mut block = tagged("Readme\nOpens Sep 2\nCloses Sep 9");
        let before = block.text().to_string();
        dedupe_due(&mut block).unwrap();
        assert_eq!(block.text(), before);
        assert_eq!(block.regions().of_kind(RegionKind::Due).count(), 2);
    }

    #[test]
    fn test_keyword_inside_title_does_not_count() {
        let mut block = tagged("Essay due soon\nOpens Sep 2");
        let before = block.text().to_string();
        dedupe_due(&mut block).unwrap();
        assert_eq!(block.text(), before);
    }
}
