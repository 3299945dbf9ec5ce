//! Form state for the add/edit dialogs.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AppError, Result};
use crate::models::schedule::{self, DATETIME_LOCAL_FORMAT, parse_datetime_local};
use crate::models::user;
use crate::models::{Schedule, ScheduleWindow, User};
use crate::realtime::path;

/// Form state for user CRUD.
#[derive(Default, Clone)]
pub struct UserForm {
    /// Key of the record being edited.
    pub original_id: Option<String>,
    pub name: String,
    pub email: String,
    pub rfid: String,
    pub batch: String,
    pub status: String,
    pub is_open: bool,
    pub is_editing: bool,
}

impl UserForm {
    /// Empty form for a new user.
    pub fn new() -> Self {
        Self {
            status: user::status::ALLOWED.to_string(),
            is_open: true,
            ..Default::default()
        }
    }

    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Create a form pre-filled for editing an existing user.
    pub fn edit(user: &User) -> Self {
        let status = if user.status.is_empty() {
            user::status::ALLOWED.to_string()
        } else {
            user.status.clone()
        };
        Self {
            original_id: Some(user.id.clone()),
            name: user.name.clone(),
            email: user.email.clone(),
            rfid: if user.rfid.is_empty() { user.id.clone() } else { user.rfid.clone() },
            batch: user.batch.clone(),
            status,
            is_open: true,
            is_editing: true,
        }
    }

    /// Check the inputs and build the record to store.
    pub fn validate(&self) -> Result<User> {
        let name = self.name.trim();
        let email = self.email.trim();
        let rfid = self.rfid.trim();
        let batch = self.batch.trim();

        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if !is_email(email) {
            return Err(AppError::validation("A valid email is required"));
        }
        if rfid.is_empty() {
            return Err(AppError::validation("RFID is required"));
        }
        path::validate_key(rfid)?;
        if batch.is_empty() {
            return Err(AppError::validation("Batch is required"));
        }
        if !user::status::ALL.contains(&self.status.as_str()) {
            return Err(AppError::validation(format!("Unknown status '{}'", self.status)));
        }

        Ok(User {
            id: rfid.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            rfid: rfid.to_string(),
            batch: batch.to_string(),
            status: self.status.clone(),
        })
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Form state for schedule CRUD.
#[derive(Clone)]
pub struct ScheduleForm {
    /// Lab and batch of the record being edited.
    pub original: Option<(String, String)>,
    pub lab_name: String,
    pub batch: String,
    pub start_date: NaiveDate,
    pub start_time: String,
    pub end_date: NaiveDate,
    pub end_time: String,
    pub status: String,
    pub is_open: bool,
    pub is_editing: bool,
}

impl Default for ScheduleForm {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::starting(today)
    }
}

impl ScheduleForm {
    /// Closed form whose dates default to `today`.
    pub fn starting(today: NaiveDate) -> Self {
        Self {
            original: None,
            lab_name: String::new(),
            batch: String::new(),
            start_date: today,
            start_time: "09:00".to_string(),
            end_date: today,
            end_time: "12:00".to_string(),
            status: schedule::status::ACTIVE.to_string(),
            is_open: false,
            is_editing: false,
        }
    }

    /// Empty form for a new schedule.
    pub fn new() -> Self {
        Self {
            is_open: true,
            ..Default::default()
        }
    }

    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Create a form pre-filled for editing an existing schedule.
    ///
    /// Unparseable stored times keep today's date and an empty time field.
    pub fn edit(schedule: &Schedule) -> Self {
        let mut form = Self::default();
        if let Some(start) = parse_datetime_local(&schedule.window.start) {
            form.start_date = start.date();
            form.start_time = start.format("%H:%M").to_string();
        } else {
            form.start_time.clear();
        }
        if let Some(end) = parse_datetime_local(&schedule.window.end) {
            form.end_date = end.date();
            form.end_time = end.format("%H:%M").to_string();
        } else {
            form.end_time.clear();
        }

        Self {
            original: Some((schedule.lab_name.clone(), schedule.batch.clone())),
            lab_name: schedule.lab_name.clone(),
            batch: schedule.batch.clone(),
            status: if schedule.window.status.is_empty() {
                schedule::status::ACTIVE.to_string()
            } else {
                schedule.window.status.clone()
            },
            is_open: true,
            is_editing: true,
            ..form
        }
    }

    /// Check the inputs and build the record to store.
    pub fn validate(&self) -> Result<Schedule> {
        let lab_name = self.lab_name.trim();
        let batch = self.batch.trim();

        if lab_name.is_empty() {
            return Err(AppError::validation("Lab name is required"));
        }
        path::validate_key(lab_name)?;
        if batch.is_empty() {
            return Err(AppError::validation("Batch is required"));
        }
        path::validate_key(batch)?;

        let start = combine(self.start_date, &self.start_time, "Start")?;
        let end = combine(self.end_date, &self.end_time, "End")?;
        if end <= start {
            return Err(AppError::validation("End must be after start"));
        }

        if self.status != schedule::status::ACTIVE && self.status != schedule::status::INACTIVE {
            return Err(AppError::validation(format!("Unknown status '{}'", self.status)));
        }

        Ok(Schedule {
            lab_name: lab_name.to_string(),
            batch: batch.to_string(),
            window: ScheduleWindow {
                start: start.format(DATETIME_LOCAL_FORMAT).to_string(),
                end: end.format(DATETIME_LOCAL_FORMAT).to_string(),
                status: self.status.clone(),
            },
        })
    }
}

/// Join a date with an `HH:MM` input.
fn combine(date: NaiveDate, time: &str, field: &str) -> Result<NaiveDateTime> {
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| AppError::validation(format!("{field} time must be HH:MM")))?;
    Ok(date.and_time(time))
}
