//! Natural-language date/time resolution.
//!
//! `DateTimeParser` turns expressions like "Sep 8 at 11:59pm" or
//! "Sept 9, 2024" into a calendar date and an optional clock time.
//! Unrecognized text resolves to an empty `ParsedDateTime`, never an error.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Resolved date and optional clock time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl ParsedDateTime {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none()
    }

    /// Date as `YYYY-MM-DD`.
    pub fn iso_date(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Time as 24-hour `HH:MM`.
    pub fn clock_time(&self) -> Option<String> {
        self.time.map(|t| t.format("%H:%M").to_string())
    }
}

/// Trait for date/time parsers.
pub trait DateTimeParser: Send + Sync {
    /// Resolve `text` into a date and/or time. Empty result means "no match".
    fn parse(&self, text: &str) -> ParsedDateTime;

    /// Date that relative and year-less expressions resolve against.
    fn reference_date(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Month number for a (possibly abbreviated) month name: "Sep", "Sept.", "September".
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim_end_matches('.').to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(name.as_str()))
        .map(|i| i as u32 + 1)
}

static ISO_T_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)T(\d)").unwrap());
static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s+(\d{4})\b)?").unwrap()
});
static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]{3,9})\b\.?(?:,?\s+(\d{4})\b)?").unwrap()
});
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());
static NUMERIC_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b").unwrap());
static RELATIVE_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(today|tonight|tomorrow|yesterday)\b").unwrap());

static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})(?::\d{2})?(?:\s*([ap])\.?m\b)?").unwrap()
});
static HOUR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*([ap])\.?m\b").unwrap());
static WORD_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(noon|midday|midnight)\b").unwrap());

/// `chrono`-backed parser resolving partial dates against a reference day.
///
/// A missing year takes the reference year. A time with no date lands on
/// the reference day. A resolved time of exactly 00:00 is reported as no
/// time at all, since listings use midnight to mean "whole day".
#[derive(Debug, Clone, Default)]
pub struct ChronoDateParser {
    reference: Option<NaiveDate>,
}

impl ChronoDateParser {
    /// Parser anchored to the current local date at each call.
    pub fn new() -> Self {
        Self { reference: None }
    }

    /// Parser anchored to a fixed date (for tests and replays).
    pub fn with_reference(reference: NaiveDate) -> Self {
        Self {
            reference: Some(reference),
        }
    }
}

impl DateTimeParser for ChronoDateParser {
    fn reference_date(&self) -> NaiveDate {
        self.reference.unwrap_or_else(|| Local::now().date_naive())
    }

    fn parse(&self, text: &str) -> ParsedDateTime {
        let normalized = ISO_T_RE.replace_all(text.trim(), "$1 $2");
        let reference = self.reference_date();

        let date = parse_date(&normalized, reference);
        let time = parse_time(&normalized);
        if date.is_none() && time.is_none() {
            return ParsedDateTime::default();
        }

        ParsedDateTime {
            date: date.or(Some(reference)),
            time: time.filter(|t| *t != NaiveTime::MIN),
        }
    }
}

fn parse_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if let Some(date) = ISO_DATE_RE.captures_iter(text).find_map(|cap| {
        NaiveDate::from_ymd_opt(num(&cap, 1)? as i32, num(&cap, 2)?, num(&cap, 3)?)
    }) {
        return Some(date);
    }

    if let Some(date) = MONTH_DAY_RE.captures_iter(text).find_map(|cap| {
        let month = month_number(cap.get(1)?.as_str())?;
        let year = num(&cap, 3).map_or(reference.year(), |y| y as i32);
        NaiveDate::from_ymd_opt(year, month, num(&cap, 2)?)
    }) {
        return Some(date);
    }

    if let Some(date) = DAY_MONTH_RE.captures_iter(text).find_map(|cap| {
        let month = month_number(cap.get(2)?.as_str())?;
        let year = num(&cap, 3).map_or(reference.year(), |y| y as i32);
        NaiveDate::from_ymd_opt(year, month, num(&cap, 1)?)
    }) {
        return Some(date);
    }

    if let Some(date) = NUMERIC_DATE_RE.captures_iter(text).find_map(|cap| {
        let year = match num(&cap, 3) {
            Some(y) if y < 100 => 2000 + y as i32,
            Some(y) => y as i32,
            None => reference.year(),
        };
        NaiveDate::from_ymd_opt(year, num(&cap, 1)?, num(&cap, 2)?)
    }) {
        return Some(date);
    }

    let cap = RELATIVE_DAY_RE.captures(text)?;
    let word = cap[1].to_lowercase();
    Some(match word.as_str() {
        "tomorrow" => reference + Duration::days(1),
        "yesterday" => reference - Duration::days(1),
        _ => reference,
    })
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    if let Some(time) = CLOCK_RE.captures_iter(text).find_map(|cap| {
        let hour = num(&cap, 1)?;
        let minute = num(&cap, 2)?;
        match cap.get(3) {
            Some(meridiem) => to_24h(hour, minute, meridiem.as_str()),
            None => NaiveTime::from_hms_opt(hour, minute, 0),
        }
    }) {
        return Some(time);
    }

    if let Some(time) = HOUR_RE
        .captures_iter(text)
        .find_map(|cap| to_24h(num(&cap, 1)?, 0, cap.get(2)?.as_str()))
    {
        return Some(time);
    }

    let cap = WORD_TIME_RE.captures(text)?;
    if cap[1].eq_ignore_ascii_case("midnight") {
        NaiveTime::from_hms_opt(0, 0, 0)
    } else {
        NaiveTime::from_hms_opt(12, 0, 0)
    }
}

fn to_24h(hour: u32, minute: u32, meridiem: &str) -> Option<NaiveTime> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = meridiem.eq_ignore_ascii_case("p");
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn num(cap: &Captures<'_>, index: usize) -> Option<u32> {
    cap.get(index).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ChronoDateParser {
        ChronoDateParser::with_reference(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap())
    }

    #[test]
    fn test_month_day_with_time() {
        let parsed = parser().parse("Sep 8 at 11:59pm");
        assert_eq!(parsed.iso_date().as_deref(), Some("2024-09-08"));
        assert_eq!(parsed.clock_time().as_deref(), Some("23:59"));
    }

    #[test]
    fn test_abbreviation_variants() {
        let p = parser();
        assert_eq!(p.parse("Sept 9, 2024").iso_date().as_deref(), Some("2024-09-09"));
        assert_eq!(p.parse("September 9th").iso_date().as_deref(), Some("2024-09-09"));
        assert_eq!(p.parse("9 Sep 2025").iso_date().as_deref(), Some("2025-09-09"));
        assert!(p.parse("Sept 9, 2024").time.is_none());
    }

    #[test]
    fn test_iso_and_numeric_dates() {
        let p = parser();
        let iso = p.parse("2024-10-07T23:59");
        assert_eq!(iso.iso_date().as_deref(), Some("2024-10-07"));
        assert_eq!(iso.clock_time().as_deref(), Some("23:59"));
        assert_eq!(p.parse("10/7/24").iso_date().as_deref(), Some("2024-10-07"));
    }

    #[test]
    fn test_time_only_lands_on_reference_day() {
        let parsed = parser().parse("11:59 PM");
        assert_eq!(parsed.iso_date().as_deref(), Some("2024-09-01"));
        assert_eq!(parsed.clock_time().as_deref(), Some("23:59"));
        assert_eq!(parser().parse("12pm").clock_time().as_deref(), Some("12:00"));
    }

    #[test]
    fn test_midnight_means_no_time() {
        let parsed = parser().parse("Sep 15 at 12am");
        assert_eq!(parsed.iso_date().as_deref(), Some("2024-09-15"));
        assert!(parsed.time.is_none());
    }

    #[test]
    fn test_relative_days() {
        assert_eq!(parser().parse("tomorrow").iso_date().as_deref(), Some("2024-09-02"));
    }

    #[test]
    fn test_unrecognized_text_is_empty() {
        let p = parser();
        assert!(p.parse("Professional emails").is_empty());
        assert!(p.parse("marker 5").is_empty());
        assert!(p.parse("Feb 30").is_empty());
        assert!(p.parse("").is_empty());
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("Sept."), Some(9));
        assert_eq!(month_number("may"), Some(5));
        assert_eq!(month_number("ju"), None);
        assert_eq!(month_number("marker"), None);
    }
}
