//! Per-item working text and its tagged regions.

use deadline_core::Result;

use crate::markup::{wrap, Region, RegionKind, TaggedRegions, ASSIGNMENT_TAG};
use crate::replace::{replace_spans, Replacement};

/// One candidate item's working text, rewritten in place by each tagging pass.
#[derive(Debug, Clone, Default)]
pub struct Block {
    text: String,
    regions: TaggedRegions,
}

impl Block {
    pub fn new(text: String, regions: TaggedRegions) -> Self {
        Self { text, regions }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn regions(&self) -> &TaggedRegions {
        &self.regions
    }

    /// Apply `edits` and keep the region set aligned with the new text.
    ///
    /// When `kind` is set, every non-empty replacement becomes a new region of
    /// that kind. Regions exactly covered by an edit are dropped.
    pub fn rewrite(&mut self, edits: &[Replacement], kind: Option<RegionKind>) -> Result<()> {
        if edits.is_empty() {
            return Ok(());
        }
        let rewrite = replace_spans(&self.text, edits)?;
        self.regions.apply_edits(edits)?;
        if let Some(kind) = kind {
            for &(start, end) in rewrite.placed.iter().filter(|(s, e)| s < e) {
                self.regions.insert(Region { kind, start, end })?;
            }
        }
        self.text = rewrite.text;
        Ok(())
    }

    pub fn finish(self) -> TaggedBlock {
        TaggedBlock {
            text: self.text,
            regions: self.regions,
        }
    }
}

/// A block after all tagging passes: at most one title, at most one due marker.
#[derive(Debug, Clone)]
pub struct TaggedBlock {
    text: String,
    regions: TaggedRegions,
}

impl TaggedBlock {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn regions(&self) -> &TaggedRegions {
        &self.regions
    }

    /// Extracted title, without its tags.
    pub fn title(&self) -> Option<&str> {
        self.regions
            .of_kind(RegionKind::Title)
            .next()
            .map(|r| self.inner(r))
    }

    /// Full `<DUE>...</DUE>` markers in text order.
    pub fn due_markers(&self) -> Vec<&str> {
        self.regions
            .of_kind(RegionKind::Due)
            .map(|r| &self.text[r.start..r.end])
            .collect()
    }

    /// Contents of the ignore-marked lines.
    pub fn ignored(&self) -> Vec<&str> {
        self.regions
            .of_kind(RegionKind::Ignore)
            .map(|r| self.inner(r))
            .collect()
    }

    /// The block wrapped in its item-boundary marker.
    pub fn wrapped(&self) -> String {
        wrap(ASSIGNMENT_TAG, &self.text)
    }

    fn inner(&self, region: &Region) -> &str {
        let (start, end) = region.inner();
        &self.text[start..end]
    }
}
