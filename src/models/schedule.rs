//! Lab schedule windows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status values offered by the schedule form.
pub mod status {
    pub const ACTIVE: &str = "active";
    pub const INACTIVE: &str = "inactive";

    /// Human-readable name for a status value.
    pub fn label(value: &str) -> &str {
        match value {
            ACTIVE => "Active",
            INACTIVE => "Inactive",
            other => other,
        }
    }
}

/// Storage format of schedule start/end.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Record stored at `/schedules/{lab}/{batch}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub status: String,
}

/// Flattened schedule row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub lab_name: String,
    pub batch: String,
    pub window: ScheduleWindow,
}

impl Schedule {
    /// Display id, unique per row.
    pub fn id(&self) -> String {
        format!("{}-{}", self.lab_name, self.batch)
    }

    /// Database path of this schedule.
    pub fn path(&self) -> String {
        schedule_path(&self.lab_name, &self.batch)
    }

    pub fn start_display(&self) -> String {
        display_datetime(&self.window.start)
    }

    pub fn end_display(&self) -> String {
        display_datetime(&self.window.end)
    }
}

/// Database path of the schedule for `lab` and `batch`.
pub fn schedule_path(lab: &str, batch: &str) -> String {
    format!("{}/{lab}/{batch}", crate::db::SCHEDULES)
}

/// Parse a stored start/end value, with or without seconds.
pub fn parse_datetime_local(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Friendly rendering, or the raw text when it does not parse.
pub fn display_datetime(value: &str) -> String {
    match parse_datetime_local(value) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None if value.trim().is_empty() => "-".to_string(),
        None => value.to_string(),
    }
}

/// Flatten the nested value at `/schedules` into rows.
pub fn schedules_from_snapshot(value: &Value) -> Vec<Schedule> {
    let Some(labs) = value.as_object() else {
        return Vec::new();
    };

    let mut schedules = Vec::new();
    for (lab_name, batches) in labs {
        let Some(batches) = batches.as_object() else {
            continue;
        };
        for (batch, entry) in batches {
            let Ok(window) = serde_json::from_value::<ScheduleWindow>(entry.clone()) else {
                continue;
            };
            schedules.push(Schedule {
                lab_name: lab_name.clone(),
                batch: batch.clone(),
                window,
            });
        }
    }
    schedules.sort_by(|a, b| (&a.lab_name, &a.batch).cmp(&(&b.lab_name, &b.batch)));
    schedules
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedules_from_snapshot() {
        let value = json!({
            "Lab-A": {
                "2024": {"start": "2025-03-01T09:00", "end": "2025-03-01T12:00", "status": "active"},
                "2023": {"start": "2025-03-02T09:00", "end": "2025-03-02T12:00", "status": "inactive"}
            },
            "Lab2": "garbage"
        });
        let schedules = schedules_from_snapshot(&value);

        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].lab_name, "Lab-A");
        assert_eq!(schedules[0].batch, "2023");
        assert_eq!(schedules[1].window.status, status::ACTIVE);
    }

    #[test]
    fn test_path_keeps_dashes_in_lab_names() {
        let schedule = Schedule {
            lab_name: "Lab-A".to_string(),
            batch: "2024-B".to_string(),
            window: ScheduleWindow::default(),
        };

        assert_eq!(schedule.path(), "schedules/Lab-A/2024-B");
        assert_eq!(schedule.id(), "Lab-A-2024-B");
    }

    #[test]
    fn test_parse_datetime_local() {
        assert!(parse_datetime_local("2025-03-01T09:00").is_some());
        assert!(parse_datetime_local("2025-03-01T09:00:30").is_some());
        assert!(parse_datetime_local("01/03/2025").is_none());
    }

    #[test]
    fn test_display_datetime() {
        assert_eq!(display_datetime("2025-03-01T09:05"), "2025-03-01 09:05");
        assert_eq!(display_datetime("tomorrow"), "tomorrow");
        assert_eq!(display_datetime(""), "-");
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status::label("active"), "Active");
        assert_eq!(status::label("paused"), "paused");
    }
}
