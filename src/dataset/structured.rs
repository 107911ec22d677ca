//! Structured-text (JSON) parsing.
//!
//! Accepts the shapes seen across dataset exports, transparently:
//! - a top-level array of record objects
//! - a single object, treated as one record
//! - an object wrapping the record array in a field (`{"data": [...]}` etc.)
//! - one JSON object per line, as a fallback when whole-text parsing fails
//!
//! Entries that are not object-shaped are discarded.

use serde_json::Value;

use crate::dataset::tabular::normalize_header;
use crate::dataset::RawRecord;

/// Field names tried, in order, when a top-level object wraps the record list.
const WRAPPER_FIELDS: &[&str] = &["data", "records", "items", "rows", "listings"];

/// Parse JSON or JSONL text into raw records with normalized keys.
pub fn parse(text: &str) -> Vec<RawRecord> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => collect_objects(items),
        Ok(Value::Object(obj)) => {
            if let Some(items) = wrapped_list(&obj) {
                collect_objects(items)
            } else {
                vec![normalize_keys(obj)]
            }
        }
        Ok(other) => {
            tracing::warn!(shape = %value_kind(&other), "top-level json value is not a record source");
            Vec::new()
        }
        Err(_) => parse_lines(text),
    }
}

fn wrapped_list(obj: &serde_json::Map<String, Value>) -> Option<Vec<Value>> {
    for field in WRAPPER_FIELDS {
        if let Some(Value::Array(items)) = obj.get(*field) {
            return Some(items.clone());
        }
    }
    // fall back to the first field holding an array of objects
    obj.values().find_map(|v| match v {
        Value::Array(items) if items.iter().any(Value::is_object) => Some(items.clone()),
        _ => None,
    })
}

fn parse_lines(text: &str) -> Vec<RawRecord> {
    let mut out = Vec::new();
    let mut discarded = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(obj)) => out.push(normalize_keys(obj)),
            _ => discarded += 1,
        }
    }
    if discarded > 0 {
        tracing::warn!(discarded, "discarded non-record lines in structured input");
    }
    out
}

fn collect_objects(items: Vec<Value>) -> Vec<RawRecord> {
    let mut discarded = 0usize;
    let out: Vec<RawRecord> = items
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(obj) => Some(normalize_keys(obj)),
            _ => {
                discarded += 1;
                None
            }
        })
        .collect();
    if discarded > 0 {
        tracing::warn!(discarded, "discarded non-object entries in structured input");
    }
    out
}

fn normalize_keys(obj: serde_json::Map<String, Value>) -> RawRecord {
    obj.into_iter()
        .map(|(k, v)| (normalize_header(&k), v))
        .collect()
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(recs: &[RawRecord]) -> Vec<String> {
        recs.iter()
            .map(|r| r.get("listing_id").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn three_shapes_yield_the_same_records() {
        let array = r#"[{"listing_id": "1"}, {"listing_id": "2"}]"#;
        let wrapped = r#"{"data": [{"listing_id": "1"}, {"listing_id": "2"}]}"#;
        let a = parse(array);
        let b = parse(wrapped);
        assert_eq!(a, b);
        assert_eq!(ids(&a), vec!["1", "2"]);

        let single = parse(r#"{"listing_id": "1"}"#);
        assert_eq!(single.len(), 1);
        assert_eq!(ids(&single), vec!["1"]);
    }

    #[test]
    fn jsonl_fallback_parses_per_line() {
        let text = "{\"listing_id\": \"1\"}\nnot json\n{\"listing_id\": \"2\"}\n";
        let recs = parse(text);
        assert_eq!(ids(&recs), vec!["1", "2"]);
    }

    #[test]
    fn non_object_entries_are_discarded() {
        let recs = parse(r#"[{"listing_id": "1"}, 42, "x", null]"#);
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn keys_are_normalized_like_csv_headers() {
        let recs = parse(r#"{"Listing ID": "1", "Seller ID": "S1"}"#);
        assert!(recs[0].contains_key("listing_id"));
        assert!(recs[0].contains_key("seller_id"));
    }

    #[test]
    fn unknown_wrapper_field_falls_back_to_first_object_array() {
        let recs = parse(r#"{"payload": [{"listing_id": "9"}], "count": 1}"#);
        assert_eq!(ids(&recs), vec!["9"]);
    }
}
