//! Data models for users, schedules, door locks, and access logs.

pub mod access_log;
pub mod door;
pub mod page;
pub mod schedule;
pub mod user;

pub use access_log::{AccessLog, access_logs_from_snapshot};
pub use door::{AccessMode, DoorLock, LockState, door_locks_from_snapshot};
pub use page::Pager;
pub use schedule::{Schedule, ScheduleWindow, schedules_from_snapshot};
pub use user::{User, users_from_snapshot};
