//! Access log entries written by the door controllers.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

const UNKNOWN: &str = "Unknown";

/// One access attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLog {
    pub key: String,
    pub user: String,
    pub card_id: String,
    /// Raw `Time` field as written by the controller.
    pub timestamp: Option<String>,
    pub status: String,
    /// Parsed `timestamp`, used for ordering.
    pub time: Option<NaiveDateTime>,
}

/// Parse controller timestamps such as `2025-3-7 9:05:02`.
///
/// Fields may be unpadded; any non-digit separates them.
pub fn parse_log_timestamp(value: &str) -> Option<NaiveDateTime> {
    let parts: Vec<u32> = value
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    let [year, month, day, hour, minute, second] = parts[..] else {
        return None;
    };

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?.and_hms_opt(hour, minute, second)
}

fn text_field(entry: &Value, name: &str) -> Option<String> {
    match entry.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Build the log list from the value at `/access_logs`, newest first.
///
/// Entries without a readable timestamp sort after all dated ones.
pub fn access_logs_from_snapshot(value: &Value) -> Vec<AccessLog> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };

    let mut logs: Vec<AccessLog> = map
        .iter()
        .filter(|(_, entry)| entry.is_object())
        .map(|(key, entry)| {
            let timestamp = text_field(entry, "Time");
            AccessLog {
                key: key.clone(),
                user: text_field(entry, "user").unwrap_or_else(|| UNKNOWN.to_string()),
                card_id: text_field(entry, "CardID").unwrap_or_default(),
                time: timestamp.as_deref().and_then(parse_log_timestamp),
                timestamp,
                status: text_field(entry, "Status").unwrap_or_else(|| UNKNOWN.to_string()),
            }
        })
        .collect();

    // Option orders None first; reversing puts it last.
    logs.sort_by(|a, b| b.time.cmp(&a.time));
    logs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_unpadded_timestamp() {
        let dt = parse_log_timestamp("2025-3-7 9:05:2").unwrap();
        assert_eq!(dt.to_string(), "2025-03-07 09:05:02");
    }

    #[test]
    fn test_parse_padded_and_iso_timestamp() {
        assert!(parse_log_timestamp("2025-03-07 09:05:02").is_some());
        assert!(parse_log_timestamp("2025-03-07T09:05:02").is_some());
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        assert!(parse_log_timestamp("").is_none());
        assert!(parse_log_timestamp("2025-13-01 00:00:00").is_none());
        assert!(parse_log_timestamp("2025-01-01").is_none());
        assert!(parse_log_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_sorted_newest_first_with_undated_last() {
        let value = json!({
            "k1": {"user": "A", "CardID": "C1", "Time": "2025-3-7 9:05:02", "Status": "Granted"},
            "k2": {"user": "B", "CardID": "C2", "Time": "2025-3-10 8:00:00", "Status": "Denied"},
            "k3": {"CardID": "C3"},
            "k4": {"user": "D", "CardID": 1234, "Time": "2025-3-7 10:00:00", "Status": "Granted"}
        });
        let logs = access_logs_from_snapshot(&value);

        let keys: Vec<_> = logs.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["k2", "k4", "k1", "k3"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let logs = access_logs_from_snapshot(&json!({"k": {"CardID": 99}}));

        assert_eq!(logs[0].user, "Unknown");
        assert_eq!(logs[0].status, "Unknown");
        assert_eq!(logs[0].card_id, "99");
        assert_eq!(logs[0].timestamp, None);
    }

    #[test]
    fn test_non_object_entries_skipped() {
        assert!(access_logs_from_snapshot(&json!({"k": 5})).is_empty());
        assert!(access_logs_from_snapshot(&Value::Null).is_empty());
    }
}
