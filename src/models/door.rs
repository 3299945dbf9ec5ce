//! Door lock states and the access-control mode.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Manual lock state of one lab door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LockState {
    #[default]
    Locked,
    Unlocked,
}

impl LockState {
    /// Read a stored value; anything but `"Unlocked"` counts as locked.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("Unlocked") => Self::Unlocked,
            _ => Self::Locked,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Locked => Self::Unlocked,
            Self::Unlocked => Self::Locked,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "Locked",
            Self::Unlocked => "Unlocked",
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment-wide access-control mode stored at `/access_control`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Doors follow the admin's lock toggles.
    #[default]
    Manual,
    /// Doors follow the lab schedules.
    Automatic,
}

impl AccessMode {
    /// Read a stored value; missing or unknown reads as manual.
    pub fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some("automatic") => Self::Automatic,
            _ => Self::Manual,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Automatic,
            Self::Automatic => Self::Manual,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatic",
        }
    }

    /// Label of the switch that flips the mode.
    pub fn switch_label(self) -> &'static str {
        match self {
            Self::Manual => "Disable Manual Lock",
            Self::Automatic => "Enable Manual Lock",
        }
    }
}

/// One row of the door lock table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorLock {
    pub lab: String,
    pub state: LockState,
}

/// Build the lab list from the value at `/door_lock`.
pub fn door_locks_from_snapshot(value: &Value) -> Vec<DoorLock> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };

    let mut locks: Vec<DoorLock> = map
        .iter()
        .map(|(lab, state)| DoorLock {
            lab: lab.clone(),
            state: LockState::from_value(Some(state)),
        })
        .collect();
    locks.sort_by(|a, b| a.lab.cmp(&b.lab));
    locks
}
