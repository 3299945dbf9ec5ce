//! Door lock and access mode writes.

use tracing::info;

use super::{ACCESS_CONTROL, DOOR_LOCK};
use crate::error::Result;
use crate::models::{AccessMode, LockState};
use crate::realtime::{RtdbClient, path};

/// Set the manual lock state of `lab`.
pub async fn set_lock_state(db: &RtdbClient, lab: &str, state: LockState) -> Result<()> {
    path::validate_key(lab)?;
    db.set(&path::join(DOOR_LOCK, lab), &state).await?;
    info!("Door {lab} set to {state}");
    Ok(())
}

/// Switch the deployment between manual and automatic locking.
pub async fn set_access_mode(db: &RtdbClient, mode: AccessMode) -> Result<()> {
    db.set(ACCESS_CONTROL, &mode).await?;
    info!("Access control mode set to {}", mode.as_str());
    Ok(())
}
