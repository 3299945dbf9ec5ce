//! Typed events of the database streaming API.

use serde::Deserialize;
use serde_json::Value;

use super::sse::SseEvent;
use crate::error::{AppError, Result};

/// Event received on a listened location.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Replace the node at `path` (relative to the listened location).
    Put { path: String, data: Value },
    /// Merge the children of `data` into the node at `path`.
    Patch { path: String, data: Value },
    KeepAlive,
    /// Server closed the stream, usually because rules now deny read access.
    Cancel(String),
    /// The auth token expired or was revoked.
    AuthRevoked,
}

#[derive(Deserialize)]
struct PathData {
    path: String,
    #[serde(default)]
    data: Value,
}

impl StreamEvent {
    /// Convert a raw SSE event. Unknown event names yield `Ok(None)`.
    pub fn from_sse(event: &SseEvent) -> Result<Option<Self>> {
        let parsed = match event.event.as_str() {
            "put" => {
                let body: PathData = serde_json::from_str(&event.data)
                    .map_err(|e| AppError::stream(format!("bad put payload: {e}")))?;
                Self::Put {
                    path: body.path,
                    data: body.data,
                }
            }
            "patch" => {
                let body: PathData = serde_json::from_str(&event.data)
                    .map_err(|e| AppError::stream(format!("bad patch payload: {e}")))?;
                Self::Patch {
                    path: body.path,
                    data: body.data,
                }
            }
            "keep-alive" => Self::KeepAlive,
            "cancel" => Self::Cancel(reason_text(&event.data)),
            "auth_revoked" => Self::AuthRevoked,
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }
}

/// Cancel payloads are JSON strings or null.
fn reason_text(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(s)) => s,
        Ok(Value::Null) => "stream cancelled".to_string(),
        _ => data.to_string(),
    }
}
