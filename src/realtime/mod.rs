//! Realtime database access over the REST API.
//!
//! Point reads and writes go through [`RtdbClient`]; live views use
//! [`subscribe`], which keeps a local mirror of the listened location up to
//! date from the server's event stream.
//!
//! # Example
//!
//! ```ignore
//! use xirtam_admin::realtime::RtdbClient;
//!
//! let client = RtdbClient::new(&config.firebase.database_url, timeout)?.with_auth(session.id_token);
//! client.set("door_lock/Lab1", "Unlocked").await?;
//! ```

mod client;
pub mod event;
pub mod path;
pub mod sse;
mod subscription;
pub mod tree;

pub use client::RtdbClient;
pub use event::StreamEvent;
pub use subscription::{Subscription, SubscriptionUpdate, subscribe};
