//! Live subscriptions to database locations.

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::client::RtdbClient;
use super::event::StreamEvent;
use super::tree;

/// Update delivered to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionUpdate {
    /// Full value of the listened location after the latest change.
    Snapshot(Value),
    /// Stream ended; the reason is shown to the user.
    Closed(String),
    /// Token expired or was revoked; resubscribe with a fresh one.
    Revoked,
}

/// Running subscription. Dropping it stops the listener.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start listening to `path` on `handle`'s runtime.
///
/// `on_update` runs on the runtime thread for every change.
pub fn subscribe<F>(handle: &Handle, client: RtdbClient, path: &str, on_update: F) -> Subscription
where
    F: Fn(SubscriptionUpdate) + Send + Sync + 'static,
{
    let task_path = path.to_string();

    let handle = handle.spawn(async move {
        info!("Subscribing to /{task_path}");
        let mut mirror = Value::Null;
        let mut ended_by_server = None;

        let result = client
            .listen(&task_path, |event| {
                match event {
                    StreamEvent::Put { path, data } => {
                        tree::apply_put(&mut mirror, &path, data);
                        on_update(SubscriptionUpdate::Snapshot(mirror.clone()));
                    }
                    StreamEvent::Patch { path, data } => {
                        tree::apply_patch(&mut mirror, &path, data);
                        on_update(SubscriptionUpdate::Snapshot(mirror.clone()));
                    }
                    StreamEvent::KeepAlive => {}
                    StreamEvent::Cancel(reason) => ended_by_server = Some(SubscriptionUpdate::Closed(reason)),
                    StreamEvent::AuthRevoked => ended_by_server = Some(SubscriptionUpdate::Revoked),
                }
                true
            })
            .await;

        let last = match (result, ended_by_server) {
            (_, Some(update)) => update,
            (Ok(()), None) => SubscriptionUpdate::Closed("connection closed by server".to_string()),
            (Err(e), None) => {
                warn!("Subscription to /{task_path} failed: {e}");
                SubscriptionUpdate::Closed(e.to_string())
            }
        };
        on_update(last);
    });

    Subscription { handle }
}
