//! Record types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A normalized deadline record.
///
/// `due_date` is `YYYY-MM-DD`, `due_time` is 24-hour `HH:MM`. Both serialize
/// as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub name: String,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
}

impl AssignmentRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            due_date: None,
            due_time: None,
        }
    }
}

/// Keys accepted for the item name, highest priority first.
pub const NAME_KEYS: &[&str] = &["name", "assignment", "title"];
/// Keys accepted for the due time, highest priority first.
pub const TIME_KEYS: &[&str] = &["due_time", "time"];

/// One item as the model emitted it, before validation.
///
/// Field values are kept as raw JSON so a number or nested object in a
/// date field drops that field instead of the whole item. Alias keys are
/// resolved here rather than through serde so an item carrying both a key
/// and its alias is still accepted.
#[derive(Debug, Clone, Default)]
pub struct RawItem {
    pub name: Option<Value>,
    pub due_date: Option<Value>,
    pub due_time: Option<Value>,
}

impl RawItem {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            name: first_usable(map, NAME_KEYS),
            due_date: map.get("due_date").cloned(),
            due_time: first_usable(map, TIME_KEYS),
        }
    }

    /// Trimmed, non-empty string name.
    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_ref())
    }

    pub fn due_date(&self) -> Option<&str> {
        non_empty(self.due_date.as_ref())
    }

    pub fn due_time(&self) -> Option<&str> {
        non_empty(self.due_time.as_ref())
    }
}

/// The first key whose value is a non-empty string.
fn first_usable(map: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| non_empty(Some(*value)).is_some())
        .cloned()
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_nulls() {
        let json = serde_json::to_value(AssignmentRecord::named("Readme")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Readme", "due_date": null, "due_time": null})
        );
    }

    fn raw(json: Value) -> RawItem {
        RawItem::from_map(json.as_object().unwrap())
    }

    #[test]
    fn test_raw_item_aliases() {
        let item = raw(serde_json::json!({"assignment": " Essay ", "time": "11:59 PM", "due_date": 7}));
        assert_eq!(item.name(), Some("Essay"));
        assert_eq!(item.due_time(), Some("11:59 PM"));
        assert_eq!(item.due_date(), None);
    }

    #[test]
    fn test_canonical_key_beats_alias() {
        let item = raw(serde_json::json!({
            "title": "Week 3",
            "name": "Essay",
            "assignment": "Essay draft",
            "time": "5pm",
            "due_time": "17:00"
        }));
        assert_eq!(item.name(), Some("Essay"));
        assert_eq!(item.due_time(), Some("17:00"));
    }

    #[test]
    fn test_blank_canonical_key_falls_back_to_alias() {
        let item = raw(serde_json::json!({"name": "  ", "title": "Lab 2", "due_time": null, "time": "9am"}));
        assert_eq!(item.name(), Some("Lab 2"));
        assert_eq!(item.due_time(), Some("9am"));
    }
}
