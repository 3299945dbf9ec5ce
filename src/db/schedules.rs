//! Schedule record writes.

use serde_json::{Map, Value};
use tracing::info;

use super::SCHEDULES;
use crate::error::Result;
use crate::models::Schedule;
use crate::models::schedule::schedule_path;
use crate::realtime::{RtdbClient, path};

fn validate(lab: &str, batch: &str) -> Result<()> {
    path::validate_key(lab)?;
    path::validate_key(batch)
}

/// Create or overwrite a schedule window.
pub async fn save(db: &RtdbClient, schedule: &Schedule) -> Result<()> {
    validate(&schedule.lab_name, &schedule.batch)?;
    db.set(&schedule.path(), &schedule.window).await?;
    info!("Saved schedule {}", schedule.id());
    Ok(())
}

/// Save `schedule` and drop the window stored under `old_lab`/`old_batch`.
pub async fn replace(db: &RtdbClient, old_lab: &str, old_batch: &str, schedule: &Schedule) -> Result<()> {
    if old_lab == schedule.lab_name && old_batch == schedule.batch {
        return save(db, schedule).await;
    }
    validate(&schedule.lab_name, &schedule.batch)?;
    validate(old_lab, old_batch)?;

    let mut changes = Map::new();
    changes.insert(
        format!("{}/{}", schedule.lab_name, schedule.batch),
        serde_json::to_value(&schedule.window)?,
    );
    changes.insert(format!("{old_lab}/{old_batch}"), Value::Null);
    db.update(SCHEDULES, &changes).await?;
    info!("Moved schedule {old_lab}-{old_batch} to {}", schedule.id());
    Ok(())
}

/// Delete the window for `lab` and `batch`.
pub async fn delete(db: &RtdbClient, lab: &str, batch: &str) -> Result<()> {
    validate(lab, batch)?;
    db.remove(&schedule_path(lab, batch)).await?;
    info!("Deleted schedule {lab}-{batch}");
    Ok(())
}
