//! Block segmentation and the full tagging pipeline.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use deadline_core::{Error, Result};
use deadline_infer::{DateTimeParser, EntityRecognizer, Span};

use crate::block::TaggedBlock;
use crate::dedup::dedupe_due;
use crate::fallback::tag_fallback;
use crate::lines::{classify_lines, HEADING_KEYWORDS};
use crate::markup::RegionKind;
use crate::merge::{merge_entities, DueCandidate};
use crate::replace::Replacement;

/// Item headings. Case-sensitive: "quiz" inside prose does not start a block.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:Assignment|Quiz)\b").unwrap());

/// Split raw input so every heading keyword starts a new block.
///
/// The keyword stays at the head of its block. Empty blocks and blocks
/// holding only a keyword are dropped.
pub fn split_blocks(text: &str) -> Vec<&str> {
    let mut cuts: Vec<usize> = HEADING_RE.find_iter(text).map(|m| m.start()).collect();
    if cuts.first() != Some(&0) {
        cuts.insert(0, 0);
    }
    cuts.push(text.len());

    cuts.windows(2)
        .map(|w| &text[w[0]..w[1]])
        .filter(|block| {
            let trimmed = block.trim();
            !trimmed.is_empty() && !HEADING_KEYWORDS.contains(&trimmed)
        })
        .collect()
}

/// Runs the tagging passes over each block with injected collaborators.
#[derive(Clone)]
pub struct Tagger {
    recognizer: Arc<dyn EntityRecognizer>,
    parser: Arc<dyn DateTimeParser>,
}

impl Tagger {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, parser: Arc<dyn DateTimeParser>) -> Self {
        Self { recognizer, parser }
    }

    pub fn parser(&self) -> Arc<dyn DateTimeParser> {
        Arc::clone(&self.parser)
    }

    pub fn recognizer_available(&self) -> bool {
        self.recognizer.is_available()
    }

    /// Tag a single block.
    pub fn tag_block(&self, raw: &str) -> Result<TaggedBlock> {
        let mut block = classify_lines(raw)?;

        let spans = self.recognizer.recognize(block.text())?;
        check_spans(block.text(), &spans)?;

        let edits: Vec<Replacement> =
            merge_entities(block.text(), &spans, block.regions(), self.parser.as_ref())
                .iter()
                .filter_map(DueCandidate::to_replacement)
                .collect();
        debug!(
            "Recognizer returned {} span(s), {} due candidate(s)",
            spans.len(),
            edits.len()
        );
        block.rewrite(&edits, Some(RegionKind::Due))?;

        tag_fallback(&mut block, self.parser.as_ref())?;
        dedupe_due(&mut block)?;

        Ok(block.finish())
    }

    /// Segment `text` and tag every block, preserving input order.
    pub fn tag_blocks(&self, text: &str) -> Result<Vec<TaggedBlock>> {
        let blocks = split_blocks(text);
        debug!("Segmented input into {} block(s)", blocks.len());
        blocks.into_iter().map(|raw| self.tag_block(raw)).collect()
    }

    /// Tagged text: every block wrapped in `<ASSIGNMENT>` and newline-joined.
    pub fn tag(&self, text: &str) -> Result<String> {
        let wrapped: Vec<String> = self
            .tag_blocks(text)?
            .iter()
            .map(TaggedBlock::wrapped)
            .collect();
        Ok(wrapped.join("\n"))
    }
}

/// Reject spans whose offsets do not address `text`.
fn check_spans(text: &str, spans: &[Span]) -> Result<()> {
    for span in spans {
        let valid = span.start < span.end
            && span.end <= text.len()
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end);
        if !valid {
            return Err(Error::Recognizer(format!(
                "{} span {}..{} is outside text of length {}",
                span.label.label(),
                span.start,
                span.end,
                text.len()
            )));
        }
    }
    Ok(())
}
