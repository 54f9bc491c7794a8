//! Line classification: ignore markup, heading removal, title extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use deadline_core::Result;

use crate::block::Block;
use crate::markup::{Region, RegionKind, TaggedRegions};

/// Phrases marking a line as non-substantive metadata (case-insensitive).
///
/// "available until" covers availability windows ("Available until Sep 15")
/// as well as "Not available until ..." notices.
pub const IGNORE_PHRASES: &[&str] = &[
    "not available",
    "points possible",
    "no submission",
    "available until",
];

/// Keywords that start a new item in a listing.
pub const HEADING_KEYWORDS: &[&str] = &["Assignment", "Quiz"];

static DUE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^due\b").unwrap());

/// How a single line is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    /// A bare section keyword; deleted from the block.
    Heading,
    Ignore,
    Title,
    Plain,
}

pub fn is_ignore_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    IGNORE_PHRASES.iter().any(|p| lower.contains(p))
}

pub fn is_heading_line(line: &str) -> bool {
    let trimmed = line.trim();
    HEADING_KEYWORDS.iter().any(|k| trimmed.eq_ignore_ascii_case(k))
}

fn starts_with_due(line: &str) -> bool {
    DUE_PREFIX_RE.is_match(line.trim_start())
}

/// Classify each line of a block. At most one line is `Title`: the first
/// non-blank line that is not ignored, not a heading and not a "Due ..." line.
pub fn classify(lines: &[&str]) -> Vec<LineClass> {
    let mut title_found = false;
    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                LineClass::Blank
            } else if is_ignore_line(line) {
                LineClass::Ignore
            } else if is_heading_line(line) {
                LineClass::Heading
            } else if !title_found && !starts_with_due(line) {
                title_found = true;
                LineClass::Title
            } else {
                LineClass::Plain
            }
        })
        .collect()
}

/// Build a block from raw text, inserting title and ignore markup.
pub fn classify_lines(raw: &str) -> Result<Block> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let classes = classify(&lines);

    let mut text = String::with_capacity(raw.len() + 64);
    let mut regions = TaggedRegions::new();

    for (i, (line, class)) in lines.iter().zip(&classes).enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let start = text.len();
        let kind = match class {
            LineClass::Heading => continue,
            LineClass::Blank | LineClass::Plain => {
                text.push_str(line);
                continue;
            }
            LineClass::Ignore => {
                text.push_str(&RegionKind::Ignore.wrap(line));
                RegionKind::Ignore
            }
            LineClass::Title => {
                text.push_str(&RegionKind::Title.wrap(line.trim()));
                RegionKind::Title
            }
        };
        regions.insert(Region {
            kind,
            start,
            end: text.len(),
        })?;
    }

    Ok(Block::new(text, regions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_listing_block() {
        let lines = [
            "Assignment",
            "Professional emails ",
            "Due Sep 8 at 11:59pm Sep 8 at 11:59pm",
            "-/4 ptsNo submission for this assignment. 4 points possible.",
        ];
        assert_eq!(
            classify(&lines),
            vec![
                LineClass::Heading,
                LineClass::Title,
                LineClass::Plain,
                LineClass::Ignore
            ]
        );
    }

    #[test]
    fn test_title_skips_ignored_and_due_lines() {
        let lines = [
            "",
            "Not available until Sep 3 at 12pm",
            "Due Sep 9",
            "AI and education",
            "Second candidate",
        ];
        let classes = classify(&lines);
        assert_eq!(classes[3], LineClass::Title);
        assert_eq!(classes.iter().filter(|c| **c == LineClass::Title).count(), 1);
        assert_eq!(classes[4], LineClass::Plain);
    }

    #[test]
    fn test_due_prefix_needs_word_boundary() {
        let classes = classify(&["Duet composition"]);
        assert_eq!(classes, vec![LineClass::Title]);
    }

    #[test]
    fn test_classify_lines_markup() {
        let raw = "Assignment\nReadme \nAvailable until Sep 15 at 11:59pm\nDue Sep 16";
        let block = classify_lines(raw).unwrap();
        assert_eq!(
            block.text(),
            "\n<ASSIGNMENT_NAME>Readme</ASSIGNMENT_NAME>\n<IGNORE>Available until Sep 15 at 11:59pm</IGNORE>\nDue Sep 16"
        );
        let kinds: Vec<RegionKind> = block.regions().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RegionKind::Title, RegionKind::Ignore]);
        for region in block.regions().iter() {
            let tagged = &block.text()[region.start..region.end];
            assert!(tagged.starts_with(&format!("<{}>", region.kind.tag())));
            assert!(tagged.ends_with(&format!("</{}>", region.kind.tag())));
        }
    }

    #[test]
    fn test_heading_only_block_has_no_title() {
        let block = classify_lines("Quiz\n").unwrap();
        assert!(block.regions().is_empty());
        assert_eq!(block.text(), "\n");
    }
}
