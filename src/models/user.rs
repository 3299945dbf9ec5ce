//! Registered RFID users.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Status values the door controller understands.
pub mod status {
    pub const ALLOWED: &str = "Allowed";
    pub const NOT_ALLOWED: &str = "Not Allowed";

    /// Choices offered by the user form.
    pub const ALL: [&str; 2] = [ALLOWED, NOT_ALLOWED];
}

/// User record stored at `/users/{rfid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Database key (the RFID tag id the record was stored under).
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub rfid: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub status: String,
}

impl User {
    /// Whether the user matches a case-insensitive search term.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        [&self.name, &self.email, &self.id, &self.batch]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Build the user list from the value at `/users`.
///
/// Entries that are not objects are skipped.
pub fn users_from_snapshot(value: &Value) -> Vec<User> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };

    let mut users: Vec<User> = map
        .iter()
        .filter_map(|(key, entry)| match serde_json::from_value::<User>(entry.clone()) {
            Ok(mut user) => {
                user.id = key.clone();
                Some(user)
            }
            Err(e) => {
                debug!("Skipping user entry '{key}': {e}");
                None
            }
        })
        .collect();
    users.sort_by(|a, b| a.id.cmp(&b.id));
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_users_from_snapshot() {
        let value = json!({
            "A1B2": {"name": "Asha", "email": "asha@example.com", "rfid": "A1B2", "batch": "2024", "status": "Allowed"},
            "C3D4": {"name": "Ben", "email": "ben@example.com", "batch": "2023"},
            "junk": "not an object"
        });
        let users = users_from_snapshot(&value);

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "A1B2");
        assert_eq!(users[0].status, status::ALLOWED);
        assert_eq!(users[1].id, "C3D4");
        assert_eq!(users[1].rfid, "");
        assert_eq!(users[1].status, "");
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(users_from_snapshot(&Value::Null).is_empty());
    }

    #[test]
    fn test_serialized_record_omits_id() {
        let user = User {
            id: "A1B2".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            rfid: "A1B2".to_string(),
            batch: "2024".to_string(),
            status: status::ALLOWED.to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();

        assert!(value.get("id").is_none());
        assert_eq!(value["rfid"], "A1B2");
    }

    #[test]
    fn test_matches() {
        let user = User {
            id: "A1B2".to_string(),
            name: "Asha Rao".to_string(),
            batch: "2024".to_string(),
            ..Default::default()
        };

        assert!(user.matches(""));
        assert!(user.matches("asha"));
        assert!(user.matches("a1b"));
        assert!(user.matches("2024"));
        assert!(!user.matches("zed"));
    }
}
