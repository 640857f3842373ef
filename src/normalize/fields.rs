//! Lenient field access over raw NocoDB rows.
//!
//! Column types drift between table versions (numbers stored as text, booleans
//! as "yes"), so every accessor coerces what it reasonably can and treats the
//! rest as absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::types::RawRecord;

/// First non-empty string among `keys`. Numbers are stringified.
pub fn text(raw: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(*key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

pub fn flag(raw: &RawRecord, key: &str) -> Option<bool> {
    match raw.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn number(raw: &RawRecord, key: &str) -> Option<f64> {
    let value = match raw.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

/// Non-negative whole count. Fractions are truncated.
pub fn count(raw: &RawRecord, key: &str) -> Option<u32> {
    number(raw, key)
        .filter(|v| *v >= 0.0)
        .map(|v| v.min(u32::MAX as f64) as u32)
}

/// Timestamp in any of the formats NocoDB emits.
pub fn timestamp(raw: &RawRecord, key: &str) -> Option<DateTime<Utc>> {
    text(raw, &[key]).and_then(|s| parse_timestamp(&s))
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // NocoDB: "2024-05-01 09:30:00+00:00"
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_text_skips_blank_and_stringifies_numbers() {
        let raw = record(json!({ "email1": "  ", "email2": "b@x.io", "Id": 42 }));
        assert_eq!(text(&raw, &["email1", "email2"]).as_deref(), Some("b@x.io"));
        assert_eq!(text(&raw, &["Id"]).as_deref(), Some("42"));
        assert_eq!(text(&raw, &["missing"]), None);
    }

    #[test]
    fn test_flag_coercions() {
        let raw = record(json!({ "a": true, "b": "Yes", "c": 0, "d": "maybe", "e": null }));
        assert_eq!(flag(&raw, "a"), Some(true));
        assert_eq!(flag(&raw, "b"), Some(true));
        assert_eq!(flag(&raw, "c"), Some(false));
        assert_eq!(flag(&raw, "d"), None);
        assert_eq!(flag(&raw, "e"), None);
    }

    #[test]
    fn test_count_rejects_negative_and_text() {
        let raw = record(json!({ "a": 3, "b": "2", "c": -1, "d": "two", "e": 2.7 }));
        assert_eq!(count(&raw, "a"), Some(3));
        assert_eq!(count(&raw, "b"), Some(2));
        assert_eq!(count(&raw, "c"), None);
        assert_eq!(count(&raw, "d"), None);
        assert_eq!(count(&raw, "e"), Some(2));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T11:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 09:30:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 09:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("last tuesday"), None);
    }
}
