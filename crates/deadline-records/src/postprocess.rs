//! Model-output repair and validation.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use deadline_infer::DateTimeParser;

use crate::types::{AssignmentRecord, RawItem};

/// Names containing this phrase (case-insensitive) never carry a deadline.
pub const UNAVAILABLE_PHRASE: &str = "not available";

type ParseStep = fn(&str) -> Option<Vec<Value>>;

/// Attempted in order; the first success wins.
const PARSE_CHAIN: &[(&str, ParseStep)] = &[("direct", parse_direct), ("bracketed", parse_bracketed)];

fn parse_direct(raw: &str) -> Option<Vec<Value>> {
    serde_json::from_str(raw).ok()
}

/// Parse the substring from the first `[` through the last `]`.
fn parse_bracketed(raw: &str) -> Option<Vec<Value>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

/// Turns raw generated text into validated `AssignmentRecord`s.
#[derive(Clone)]
pub struct RecordPostprocessor {
    parser: Arc<dyn DateTimeParser>,
}

impl RecordPostprocessor {
    pub fn new(parser: Arc<dyn DateTimeParser>) -> Self {
        Self { parser }
    }

    /// Repair and validate `raw`. Never fails; unrecoverable input yields `[]`.
    pub fn process(&self, raw: &str) -> Vec<AssignmentRecord> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        let Some(items) = PARSE_CHAIN.iter().find_map(|(step, parse)| {
            let parsed = parse(raw);
            if parsed.is_some() {
                debug!("Model output parsed ({})", step);
            }
            parsed
        }) else {
            warn!("Could not parse a JSON array from model output ({} bytes)", raw.len());
            return Vec::new();
        };

        let total = items.len();
        let records: Vec<AssignmentRecord> = items
            .iter()
            .filter_map(|item| self.validate(item))
            .collect();
        if records.len() < total {
            debug!("Dropped {} unusable item(s)", total - records.len());
        }
        records
    }

    fn validate(&self, item: &Value) -> Option<AssignmentRecord> {
        let raw = RawItem::from_map(item.as_object()?);
        let name = raw.name()?;
        let mut record = AssignmentRecord::named(name);

        if name.to_lowercase().contains(UNAVAILABLE_PHRASE) {
            return Some(record);
        }

        let mut time_text = raw.due_time().map(str::to_string);
        if let Some(date_text) = raw.due_date() {
            let parsed = self.parser.parse(date_text);
            record.due_date = parsed.iso_date();
            if time_text.is_none() {
                time_text = parsed.clock_time();
            }
        }
        record.due_time = time_text.and_then(|t| self.parser.parse(&t).clock_time());

        Some(record)
    }
}

/// For each timed record, emit an all-day copy named `"<name> (<HH:MM>)"`
/// directly before it.
pub fn with_all_day_copies(records: Vec<AssignmentRecord>) -> Vec<AssignmentRecord> {
    let mut out = Vec::with_capacity(records.len() * 2);
    for record in records {
        if let Some(time) = record.due_time.as_deref() {
            out.push(AssignmentRecord {
                name: format!("{} ({})", record.name, time),
                due_date: record.due_date.clone(),
                due_time: None,
            });
        }
        out.push(record);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use deadline_infer::ChronoDateParser;

    fn postprocessor() -> RecordPostprocessor {
        let parser = ChronoDateParser::with_reference(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        RecordPostprocessor::new(Arc::new(parser))
    }

    #[test]
    fn test_bracketed_fallback() {
        assert!(parse_direct("Sure! [1]").is_none());
        assert_eq!(parse_bracketed("Sure! [1, 2] done").map(|v| v.len()), Some(2));
        assert!(parse_bracketed("] backwards [").is_none());
        assert!(parse_bracketed("no array").is_none());
    }

    #[test]
    fn test_time_pulled_from_date_field() {
        let records = postprocessor()
            .process(r#"[{"name": "Essay", "due_date": "Sep 8 at 11:59pm", "due_time": null}]"#);
        assert_eq!(records[0].due_date.as_deref(), Some("2024-09-08"));
        assert_eq!(records[0].due_time.as_deref(), Some("23:59"));
    }

    #[test]
    fn test_existing_time_wins_and_is_normalized() {
        let records = postprocessor().process(
            r#"[{"name": "Lab", "due_date": "2024-10-07T23:59", "due_time": "5:00 PM"}]"#,
        );
        assert_eq!(records[0].due_date.as_deref(), Some("2024-10-07"));
        assert_eq!(records[0].due_time.as_deref(), Some("17:00"));
    }

    #[test]
    fn test_unparseable_fields_are_dropped() {
        let records = postprocessor()
            .process(r#"[{"name": "Lab", "due_date": "whenever", "due_time": "later"}]"#);
        assert_eq!(records, vec![AssignmentRecord::named("Lab")]);
    }

    #[test]
    fn test_non_objects_and_nameless_items_are_dropped() {
        let records = postprocessor().process(
            r#"[1, "text", {"due_date": "Sep 9"}, {"name": "  "}, {"name": "Kept", "due_date": "Sep 9"}]"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Kept");
    }

    #[test]
    fn test_all_day_copies() {
        let timed = AssignmentRecord {
            name: "Essay".into(),
            due_date: Some("2024-09-08".into()),
            due_time: Some("23:59".into()),
        };
        let all_day = AssignmentRecord {
            name: "Reading".into(),
            due_date: Some("2024-09-09".into()),
            due_time: None,
        };
        let out = with_all_day_copies(vec![timed.clone(), all_day.clone()]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].name, "Essay (23:59)");
        assert_eq!(out[0].due_date.as_deref(), Some("2024-09-08"));
        assert!(out[0].due_time.is_none());
        assert_eq!(out[1], timed);
        assert_eq!(out[2], all_day);
    }
}
