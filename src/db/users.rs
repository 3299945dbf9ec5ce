//! User record writes.

use serde_json::{Map, Value};
use tracing::info;

use super::USERS;
use crate::error::Result;
use crate::models::User;
use crate::realtime::{RtdbClient, path};

/// Database path of the user stored under `id`.
pub fn user_path(id: &str) -> String {
    path::join(USERS, id)
}

/// Create or overwrite the user stored under its RFID.
pub async fn save(db: &RtdbClient, user: &User) -> Result<()> {
    path::validate_key(&user.rfid)?;
    db.set(&user_path(&user.rfid), user).await?;
    info!("Saved user {}", user.rfid);
    Ok(())
}

/// Save `user` and drop the record previously stored under `old_id`.
///
/// Both changes go out as one multi-path update, so the user never exists
/// twice or not at all.
pub async fn replace(db: &RtdbClient, old_id: &str, user: &User) -> Result<()> {
    if old_id == user.rfid {
        return save(db, user).await;
    }
    path::validate_key(&user.rfid)?;
    path::validate_key(old_id)?;

    let mut changes = Map::new();
    changes.insert(user.rfid.clone(), serde_json::to_value(user)?);
    changes.insert(old_id.to_string(), Value::Null);
    db.update(USERS, &changes).await?;
    info!("Moved user {old_id} to {}", user.rfid);
    Ok(())
}

/// Delete the user stored under `id`.
pub async fn delete(db: &RtdbClient, id: &str) -> Result<()> {
    path::validate_key(id)?;
    db.remove(&user_path(id)).await?;
    info!("Deleted user {id}");
    Ok(())
}
