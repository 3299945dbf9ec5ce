pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod realtime;
pub mod ui;

pub use error::{AppError, Result};
