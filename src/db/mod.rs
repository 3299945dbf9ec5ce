//! Record operations on the realtime database.

pub mod connection;
pub mod door_lock;
pub mod schedules;
pub mod users;

pub use connection::test_connection;

/// `/users/{rfid}`: registered users.
pub const USERS: &str = "users";
/// `/schedules/{lab}/{batch}`: schedule windows.
pub const SCHEDULES: &str = "schedules";
/// `/door_lock/{lab}`: manual lock state per lab.
pub const DOOR_LOCK: &str = "door_lock";
/// `/access_control`: manual or automatic mode.
pub const ACCESS_CONTROL: &str = "access_control";
/// `/access_logs/{key}`: controller access events.
pub const ACCESS_LOGS: &str = "access_logs";
