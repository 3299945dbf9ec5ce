//! Database reachability checks.

use std::time::Duration;

/// Check that the database host answers at all.
///
/// Any HTTP response counts, including "Permission denied": the probe runs
/// before anyone has signed in.
pub async fn test_connection(database_url: &str) -> Result<(), String> {
    if database_url.is_empty() {
        return Err("URL is empty".to_string());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| e.to_string())?;

    let url = format!("{}/.json?shallow=true", database_url.trim_end_matches('/'));
    client.get(url).send().await.map_err(|e| e.to_string())?;

    Ok(())
}
