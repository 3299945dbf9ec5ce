//! GUI panels and application state.

pub mod access_logs_panel;
pub mod app;
pub mod components;
pub mod door_lock_panel;
pub mod forms;
pub mod login;
pub mod schedules_panel;
pub mod setup_wizard;
pub mod users_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
