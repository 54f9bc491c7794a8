//! Markup vocabulary and the tagged-region set.
//!
//! Every tag inserted into a block is tracked as a `Region` so later
//! passes can ask "is this range already tagged?" with an interval check
//! instead of re-scanning the markup text.

use deadline_core::{Error, Result};
use deadline_infer::ParsedDateTime;

use crate::replace::Replacement;

pub const ASSIGNMENT_TAG: &str = "ASSIGNMENT";
pub const DATE_TAG: &str = "DATE";
pub const TIME_TAG: &str = "TIME";

/// Wrap `inner` in a matched `<TAG>...</TAG>` pair.
pub fn wrap(tag: &str, inner: &str) -> String {
    format!("<{tag}>{inner}</{tag}>")
}

/// `<DUE><DATE>YYYY-MM-DD</DATE> <TIME>HH:MM</TIME></DUE>`, time optional.
///
/// Returns None without a date: a bare time cannot anchor a deadline.
pub fn due_markup(parsed: &ParsedDateTime) -> Option<String> {
    let date = parsed.iso_date()?;
    let mut inner = wrap(DATE_TAG, &date);
    if let Some(time) = parsed.clock_time() {
        inner.push(' ');
        inner.push_str(&wrap(TIME_TAG, &time));
    }
    Some(RegionKind::Due.wrap(&inner))
}

/// Kind of markup a region carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// `<ASSIGNMENT_NAME>` around the item title.
    Title,
    /// `<IGNORE>` around metadata lines.
    Ignore,
    /// `<DUE>` around a resolved date/time.
    Due,
}

impl RegionKind {
    pub fn tag(&self) -> &'static str {
        match self {
            RegionKind::Title => "ASSIGNMENT_NAME",
            RegionKind::Ignore => "IGNORE",
            RegionKind::Due => "DUE",
        }
    }

    pub fn wrap(&self, inner: &str) -> String {
        wrap(self.tag(), inner)
    }

    /// Byte length of the opening and closing tags.
    pub fn tag_lens(&self) -> (usize, usize) {
        let tag = self.tag().len();
        (tag + 2, tag + 3)
    }
}

/// A tagged byte range `[start, end)`, tags included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }

    /// Range of the content between the tags.
    pub fn inner(&self) -> (usize, usize) {
        let (open, close) = self.kind.tag_lens();
        (self.start + open, self.end.saturating_sub(close))
    }
}

/// Sorted, non-overlapping set of tagged regions within one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedRegions {
    regions: Vec<Region>,
}

impl TaggedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn of_kind(&self, kind: RegionKind) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |r| r.kind == kind)
    }

    /// True if any tagged region shares a byte with `[start, end)`.
    pub fn is_covered(&self, start: usize, end: usize) -> bool {
        self.regions.iter().any(|r| r.overlaps(start, end))
    }

    /// Insert a region, keeping the set sorted. Overlap is an invariant violation.
    pub fn insert(&mut self, region: Region) -> Result<()> {
        if region.start >= region.end {
            return Err(Error::Invariant(format!(
                "empty {} region at {}",
                region.kind.tag(),
                region.start
            )));
        }
        if let Some(existing) = self.regions.iter().find(|r| r.overlaps(region.start, region.end)) {
            return Err(Error::Invariant(format!(
                "{} region {}..{} overlaps {} region {}..{}",
                region.kind.tag(),
                region.start,
                region.end,
                existing.kind.tag(),
                existing.start,
                existing.end
            )));
        }
        let at = self.regions.partition_point(|r| r.start < region.start);
        self.regions.insert(at, region);
        Ok(())
    }

    /// Re-position regions after `edits` were applied to the text.
    ///
    /// A region exactly covered by an edit is dropped (the edit replaced it).
    /// Any other overlap between an edit and a region is rejected.
    pub fn apply_edits(&mut self, edits: &[Replacement]) -> Result<()> {
        let mut shifted = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            let mut offset: isize = 0;
            let mut replaced = false;
            for edit in edits {
                if edit.end <= region.start {
                    offset += edit.delta();
                } else if edit.start == region.start && edit.end == region.end {
                    replaced = true;
                } else if edit.start < region.end {
                    return Err(Error::Invariant(format!(
                        "edit {}..{} cuts into {} region {}..{}",
                        edit.start,
                        edit.end,
                        region.kind.tag(),
                        region.start,
                        region.end
                    )));
                }
            }
            if !replaced {
                shifted.push(Region {
                    kind: region.kind,
                    start: region.start.checked_add_signed(offset).ok_or_else(underflow)?,
                    end: region.end.checked_add_signed(offset).ok_or_else(underflow)?,
                });
            }
        }
        self.regions = shifted;
        Ok(())
    }
}

fn underflow() -> Error {
    Error::Invariant("region shifted before start of text".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn region(kind: RegionKind, start: usize, end: usize) -> Region {
        Region { kind, start, end }
    }

    #[test]
    fn test_due_markup() {
        let parsed = ParsedDateTime {
            date: NaiveDate::from_ymd_opt(2024, 9, 8),
            time: NaiveTime::from_hms_opt(23, 59, 0),
        };
        assert_eq!(
            due_markup(&parsed).as_deref(),
            Some("<DUE><DATE>2024-09-08</DATE> <TIME>23:59</TIME></DUE>")
        );

        let date_only = ParsedDateTime { time: None, ..parsed };
        assert_eq!(
            due_markup(&date_only).as_deref(),
            Some("<DUE><DATE>2024-09-08</DATE></DUE>")
        );

        let time_only = ParsedDateTime { date: None, ..parsed };
        assert!(due_markup(&time_only).is_none());
    }

    #[test]
    fn test_insert_keeps_order_and_rejects_overlap() {
        let mut regions = TaggedRegions::new();
        regions.insert(region(RegionKind::Ignore, 20, 30)).unwrap();
        regions.insert(region(RegionKind::Title, 0, 10)).unwrap();
        let starts: Vec<usize> = regions.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0, 20]);

        let err = regions.insert(region(RegionKind::Due, 25, 35)).unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
    }

    #[test]
    fn test_apply_edits_shifts_and_drops() {
        let mut regions = TaggedRegions::new();
        regions.insert(region(RegionKind::Title, 0, 10)).unwrap();
        regions.insert(region(RegionKind::Due, 15, 20)).unwrap();
        regions.insert(region(RegionKind::Ignore, 30, 40)).unwrap();

        // Grow 11..13 by 3 bytes, delete the due region entirely.
        let edits = vec![
            Replacement::new(11, 13, "abcde"),
            Replacement::new(15, 20, ""),
        ];
        regions.apply_edits(&edits).unwrap();

        let got: Vec<(RegionKind, usize, usize)> =
            regions.iter().map(|r| (r.kind, r.start, r.end)).collect();
        assert_eq!(
            got,
            vec![(RegionKind::Title, 0, 10), (RegionKind::Ignore, 28, 38)]
        );
    }

    #[test]
    fn test_apply_edits_rejects_partial_overlap() {
        let mut regions = TaggedRegions::new();
        regions.insert(region(RegionKind::Ignore, 5, 15)).unwrap();
        let err = regions.apply_edits(&[Replacement::new(10, 20, "x")]).unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
    }

    #[test]
    fn test_region_inner() {
        let text = RegionKind::Title.wrap("Readme");
        let r = region(RegionKind::Title, 0, text.len());
        let (s, e) = r.inner();
        assert_eq!(&text[s..e], "Readme");
    }
}
