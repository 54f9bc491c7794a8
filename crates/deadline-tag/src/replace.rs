//! Offset-safe span replacement.
//!
//! Applies a batch of `(span, replacement)` edits in one left-to-right pass.
//! Edits are expressed in the coordinates of the input text; each lands at
//! `start + cumulative_offset`, where the offset accumulates the length
//! change of every earlier edit.

use deadline_core::{Error, Result};

/// Replace `[start, end)` of the original text with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Replacement {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Length change this edit causes.
    pub fn delta(&self) -> isize {
        self.text.len() as isize - (self.end - self.start) as isize
    }
}

/// Output of `replace_spans`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Where each replacement landed in the new text, in edit order.
    pub placed: Vec<(usize, usize)>,
}

/// Apply `edits` to `text`.
///
/// Edits must be sorted by `start`, non-empty, non-overlapping and on char
/// boundaries. Anything else signals a defect in the stage that produced
/// them and is reported as `Error::Invariant`.
pub fn replace_spans(text: &str, edits: &[Replacement]) -> Result<Rewrite> {
    validate(text, edits)?;

    let growth: usize = edits.iter().map(|e| e.text.len()).sum();
    let mut out = String::with_capacity(text.len() + growth);
    let mut placed = Vec::with_capacity(edits.len());
    let mut offset: isize = 0;
    let mut last_end = 0;

    for edit in edits {
        out.push_str(&text[last_end..edit.start]);
        let at = edit.start as isize + offset;
        debug_assert_eq!(at as usize, out.len());
        out.push_str(&edit.text);
        placed.push((at as usize, at as usize + edit.text.len()));
        offset += edit.delta();
        last_end = edit.end;
    }
    out.push_str(&text[last_end..]);

    Ok(Rewrite { text: out, placed })
}

fn validate(text: &str, edits: &[Replacement]) -> Result<()> {
    let mut prev_end = 0;
    for (i, edit) in edits.iter().enumerate() {
        if edit.start >= edit.end || edit.end > text.len() {
            return Err(Error::Invariant(format!(
                "edit #{} has invalid range {}..{} for text of length {}",
                i,
                edit.start,
                edit.end,
                text.len()
            )));
        }
        if !text.is_char_boundary(edit.start) || !text.is_char_boundary(edit.end) {
            return Err(Error::Invariant(format!(
                "edit #{} range {}..{} splits a character",
                i, edit.start, edit.end
            )));
        }
        if edit.start < prev_end {
            return Err(Error::Invariant(format!(
                "edit #{} at {} overlaps or precedes previous edit ending at {}",
                i, edit.start, prev_end
            )));
        }
        prev_end = edit.end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacements_shift_later_spans() {
        let text = "Due Sep 8 at 11:59pm Sep 8 at 11:59pm";
        let edits = vec![
            Replacement::new(4, 20, "<DUE>A</DUE>"),
            Replacement::new(21, 37, "<DUE>BB</DUE>"),
        ];
        let rewrite = replace_spans(text, &edits).unwrap();
        assert_eq!(rewrite.text, "Due <DUE>A</DUE> <DUE>BB</DUE>");
        for (edit, &(s, e)) in edits.iter().zip(&rewrite.placed) {
            assert_eq!(&rewrite.text[s..e], edit.text);
        }
    }

    #[test]
    fn test_positions_match_cumulative_offset() {
        let text = "aaaa bbbb cccc dddd eeee ffff";
        let edits = vec![
            Replacement::new(0, 4, "X"),
            Replacement::new(5, 9, "a much longer replacement"),
            Replacement::new(15, 19, ""),
            Replacement::new(20, 24, "YY"),
        ];
        let rewrite = replace_spans(text, &edits).unwrap();

        // Recompute where each edit should land without looking at the output.
        let mut cumulative = 0isize;
        for (edit, &(s, e)) in edits.iter().zip(&rewrite.placed) {
            let expected = (edit.start as isize + cumulative) as usize;
            assert_eq!(s, expected);
            assert_eq!(e, expected + edit.text.len());
            cumulative += edit.text.len() as isize - (edit.end - edit.start) as isize;
        }
        assert_eq!(rewrite.text, "X a much longer replacement cccc  YY ffff");
    }

    #[test]
    fn test_no_edits_is_identity() {
        let rewrite = replace_spans("unchanged", &[]).unwrap();
        assert_eq!(rewrite.text, "unchanged");
        assert!(rewrite.placed.is_empty());
    }

    #[test]
    fn test_overlapping_edits_are_invariant_violations() {
        let edits = vec![Replacement::new(0, 5, "x"), Replacement::new(3, 8, "y")];
        assert!(matches!(
            replace_spans("0123456789", &edits),
            Err(Error::Invariant(_))
        ));
    }

    #[test]
    fn test_out_of_order_edits_are_invariant_violations() {
        let edits = vec![Replacement::new(6, 8, "x"), Replacement::new(0, 2, "y")];
        assert!(matches!(
            replace_spans("0123456789", &edits),
            Err(Error::Invariant(_))
        ));
    }

    #[test]
    fn test_bad_ranges_are_rejected() {
        assert!(replace_spans("abc", &[Replacement::new(1, 1, "x")]).is_err());
        assert!(replace_spans("abc", &[Replacement::new(1, 9, "x")]).is_err());
        assert!(replace_spans("né", &[Replacement::new(0, 2, "x")]).is_err());
    }

    #[test]
    fn test_adjacent_edits_are_allowed() {
        let edits = vec![Replacement::new(0, 2, "A"), Replacement::new(2, 4, "B")];
        assert_eq!(replace_spans("abcd", &edits).unwrap().text, "AB");
    }
}
