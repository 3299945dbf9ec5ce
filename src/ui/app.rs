//! Main application UI.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use eframe::egui::{self, Align, Layout, RichText};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CALENDAR, DOOR, LIST_BULLETS, SIGN_OUT, USERS};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::auth::{AuthClient, Session};
use crate::config::AppConfig;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{
    AccessLog, AccessMode, DoorLock, LockState, Pager, Schedule, User, access_logs_from_snapshot,
    door_locks_from_snapshot, schedules_from_snapshot, users_from_snapshot,
};
use crate::realtime::{RtdbClient, Subscription, SubscriptionUpdate, subscribe};

use super::components::{colors, styled_button_with_icon};
use super::forms::{ScheduleForm, UserForm};
use super::login::{self, LoginState};
use super::{access_logs_panel, door_lock_panel, schedules_panel, users_panel};

/// How often the UI wakes up to check the token expiry while idle.
const REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Wait before retrying a refresh that failed without ending the session.
const REFRESH_RETRY_DELAY: TimeDelta = TimeDelta::seconds(30);

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Admin,
}

/// Admin panel tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Users,
    Schedules,
    AccessLogs,
    DoorLock,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Users, Tab::Schedules, Tab::AccessLogs, Tab::DoorLock];

    /// Get the display name for the tab.
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Users => "Manage Users",
            Tab::Schedules => "Manage Schedules",
            Tab::AccessLogs => "Access Logs",
            Tab::DoorLock => "Manual Door Lock",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tab::Users => USERS,
            Tab::Schedules => CALENDAR,
            Tab::AccessLogs => LIST_BULLETS,
            Tab::DoorLock => DOOR,
        }
    }

    /// Database locations the tab listens to while active.
    pub fn feeds(&self) -> &'static [Feed] {
        match self {
            Tab::Users => &[Feed::Users],
            Tab::Schedules => &[Feed::Schedules],
            Tab::AccessLogs => &[Feed::AccessLogs],
            Tab::DoorLock => &[Feed::AccessMode, Feed::DoorLocks],
        }
    }
}

/// One subscribed database location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Users,
    Schedules,
    AccessLogs,
    DoorLocks,
    AccessMode,
}

impl Feed {
    pub fn path(&self) -> &'static str {
        match self {
            Feed::Users => db::USERS,
            Feed::Schedules => db::SCHEDULES,
            Feed::AccessLogs => db::ACCESS_LOGS,
            Feed::DoorLocks => db::DOOR_LOCK,
            Feed::AccessMode => db::ACCESS_CONTROL,
        }
    }
}

/// State of a live subscription.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LiveStatus {
    #[default]
    Idle,
    Connecting,
    Live,
    Closed(String),
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Session
    SignedIn(Session),
    SignInFailed(AppError),
    TokenRefreshed(Session),
    RefreshFailed(AppError),

    // Live data
    Feed {
        feed: Feed,
        generation: u64,
        update: SubscriptionUpdate,
    },

    // CRUD operations
    UserSaved { added: bool },
    UserDeleted,
    ScheduleSaved { added: bool },
    ScheduleDeleted,
    LockWriteFailed { lab: String, previous: LockState, error: String },
    ModeWriteFailed { previous: AccessMode, error: String },
    OperationFailed(String),
}

/// Sender handed to async tasks; wakes the UI after each message.
#[derive(Clone)]
pub struct UiSender {
    tx: mpsc::UnboundedSender<UiMessage>,
    ctx: egui::Context,
}

impl UiSender {
    pub fn send(&self, msg: UiMessage) {
        let _ = self.tx.send(msg);
        self.ctx.request_repaint();
    }
}

/// Target for delete confirmation dialog.
#[derive(Clone)]
pub enum DeleteTarget {
    User { id: String, name: String },
    Schedule { lab: String, batch: String },
}

/// Main application state.
pub struct App {
    // Runtime and clients
    pub rt: tokio::runtime::Runtime,
    auth: Arc<AuthClient>,
    pub db: RtdbClient,

    // Message channel for async communication
    sender: UiSender,
    rx: mpsc::UnboundedReceiver<UiMessage>,

    // Session
    pub screen: Screen,
    pub login: LoginState,
    pub session: Option<Session>,
    refreshing: bool,
    refresh_retry_at: Option<DateTime<Utc>>,

    // Navigation
    pub current_tab: Tab,

    // Live subscriptions of the current tab
    subscriptions: Vec<Subscription>,
    generation: u64,
    feed_status: HashMap<Feed, LiveStatus>,
    pub last_update: Option<DateTime<Local>>,

    // Cached data
    pub users: Vec<User>,
    pub schedules: Vec<Schedule>,
    pub access_logs: Vec<AccessLog>,
    pub door_locks: Vec<DoorLock>,
    pub access_mode: AccessMode,

    // Forms
    pub user_form: UserForm,
    pub schedule_form: ScheduleForm,
    pub user_search: String,
    pub logs_pager: Pager,

    // Configuration
    pub config: AppConfig,
    config_path: PathBuf,

    // Dialogs
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(
        ctx: egui::Context,
        config: AppConfig,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let timeout = Duration::from_secs(config.firebase.request_timeout_secs);
        let auth = Arc::new(AuthClient::new(&config.firebase)?);
        let db = RtdbClient::new(&config.firebase.database_url, timeout)?;

        let mut login = LoginState::default();
        if config.ui.remember_email {
            login.email = config.ui.last_email.clone();
        }

        Ok(Self {
            rt,
            auth,
            db,
            sender: UiSender { tx, ctx },
            rx,
            screen: Screen::Login,
            login,
            session: None,
            refreshing: false,
            refresh_retry_at: None,
            current_tab: Tab::default(),
            subscriptions: Vec::new(),
            generation: 0,
            feed_status: HashMap::new(),
            last_update: None,
            users: Vec::new(),
            schedules: Vec::new(),
            access_logs: Vec::new(),
            door_locks: Vec::new(),
            access_mode: AccessMode::default(),
            user_form: UserForm::default(),
            schedule_form: ScheduleForm::default(),
            user_search: String::new(),
            logs_pager: Pager::new(config.ui.logs_page_size),
            config,
            config_path,
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
        })
    }

    /// Sign in with the credentials on the login screen.
    pub fn sign_in(&mut self) {
        let email = self.login.email.trim().to_string();
        let password = self.login.password.clone();
        if email.is_empty() || password.is_empty() {
            self.login.error = Some("Email and password are required".to_string());
            return;
        }

        self.login.error = None;
        self.login.in_progress = true;

        let auth = self.auth.clone();
        let sender = self.sender.clone();

        self.rt.spawn(async move {
            match auth.sign_in(&email, &password).await {
                Ok(session) if session.is_admin() => sender.send(UiMessage::SignedIn(session)),
                Ok(session) => {
                    warn!("Rejected sign-in for {}: no admin role", session.email);
                    sender.send(UiMessage::SignInFailed(AppError::NotAdmin));
                }
                Err(e) => sender.send(UiMessage::SignInFailed(e)),
            }
        });
    }

    /// Drop the session and everything loaded with it.
    pub fn logout(&mut self) {
        if let Some(session) = &self.session {
            info!("Signing out {}", session.email);
        }
        self.unsubscribe();
        self.session = None;
        self.refreshing = false;
        self.refresh_retry_at = None;
        self.db.set_auth(None);

        self.users.clear();
        self.schedules.clear();
        self.access_logs.clear();
        self.door_locks.clear();
        self.access_mode = AccessMode::default();
        self.user_form.reset();
        self.schedule_form.reset();
        self.user_search.clear();
        self.logs_pager.first();
        self.show_delete_confirm = false;
        self.delete_target = None;

        self.login.password.clear();
        self.login.in_progress = false;
        self.current_tab = Tab::default();
        self.screen = Screen::Login;
    }

    fn on_signed_in(&mut self, session: Session) {
        self.login.in_progress = false;
        self.login.password.clear();
        self.login.error = None;

        if self.config.ui.remember_email && self.config.ui.last_email != session.email {
            self.config.ui.last_email = session.email.clone();
            if let Err(e) = self.config.save(&self.config_path) {
                warn!("Failed to remember email: {}", e);
            }
        }

        self.db.set_auth(Some(session.id_token.clone()));
        self.session = Some(session);
        self.screen = Screen::Admin;
        self.subscribe_current_tab();
    }

    /// Refresh the ID token when it is about to expire.
    fn check_token_refresh(&mut self) {
        let now = Utc::now();
        let due = self.session.as_ref().is_some_and(|session| session.needs_refresh(now))
            && self.refresh_retry_at.is_none_or(|at| now >= at);
        if due {
            self.start_token_refresh();
        }
    }

    fn start_token_refresh(&mut self) {
        if self.refreshing {
            return;
        }
        let Some(session) = self.session.clone() else {
            return;
        };
        self.refreshing = true;

        let auth = self.auth.clone();
        let sender = self.sender.clone();

        self.rt.spawn(async move {
            match auth.refresh(&session).await {
                Ok(session) => sender.send(UiMessage::TokenRefreshed(session)),
                Err(e) => sender.send(UiMessage::RefreshFailed(e)),
            }
        });
    }

    /// Switch to another tab, moving the live subscriptions with it.
    pub fn switch_tab(&mut self, tab: Tab) {
        if self.current_tab == tab {
            return;
        }
        self.current_tab = tab;
        self.user_form.reset();
        self.schedule_form.reset();
        self.subscribe_current_tab();
    }

    fn unsubscribe(&mut self) {
        // Dropping a subscription aborts its listener
        self.subscriptions.clear();
        self.generation += 1;
        self.feed_status.clear();
    }

    /// Mark every feed of the current tab as connecting.
    fn begin_feeds(&mut self) {
        self.feed_status = self
            .current_tab
            .feeds()
            .iter()
            .map(|&feed| (feed, LiveStatus::Connecting))
            .collect();
    }

    /// Combined state of the current tab's feeds.
    ///
    /// Any closed feed wins; `Live` needs a snapshot from every feed.
    pub fn live_status(&self) -> LiveStatus {
        if self.feed_status.is_empty() {
            return LiveStatus::Idle;
        }
        if let Some(closed) = self
            .feed_status
            .values()
            .find(|status| matches!(status, LiveStatus::Closed(_)))
        {
            return closed.clone();
        }
        if self.feed_status.values().all(|status| *status == LiveStatus::Live) {
            LiveStatus::Live
        } else {
            LiveStatus::Connecting
        }
    }

    /// Whether `feed` has delivered data and is still streaming.
    pub fn feed_ready(&self, feed: Feed) -> bool {
        self.feed_status.get(&feed) == Some(&LiveStatus::Live)
    }

    /// Whether any feed of the current tab is still waiting for its first snapshot.
    pub fn is_loading(&self) -> bool {
        self.feed_status.values().any(|status| *status == LiveStatus::Connecting)
    }

    /// (Re)open the live subscriptions of the current tab.
    pub fn subscribe_current_tab(&mut self) {
        self.unsubscribe();
        if self.session.is_none() {
            return;
        }

        self.begin_feeds();
        let generation = self.generation;

        for &feed in self.current_tab.feeds() {
            let sender = self.sender.clone();
            let subscription = subscribe(self.rt.handle(), self.db.clone(), feed.path(), move |update| {
                sender.send(UiMessage::Feed {
                    feed,
                    generation,
                    update,
                });
            });
            self.subscriptions.push(subscription);
        }
    }

    fn on_feed_update(&mut self, feed: Feed, update: SubscriptionUpdate) {
        match update {
            SubscriptionUpdate::Snapshot(value) => {
                self.apply_snapshot(feed, &value);
                self.feed_status.insert(feed, LiveStatus::Live);
                self.last_update = Some(Local::now());
            }
            SubscriptionUpdate::Closed(reason) => {
                warn!("Subscription to /{} closed: {}", feed.path(), reason);
                self.feed_status.insert(feed, LiveStatus::Closed(reason));
            }
            SubscriptionUpdate::Revoked => {
                info!("Credentials revoked on /{}, refreshing token", feed.path());
                self.start_token_refresh();
            }
        }
    }

    fn apply_snapshot(&mut self, feed: Feed, value: &Value) {
        match feed {
            Feed::Users => self.users = users_from_snapshot(value),
            Feed::Schedules => self.schedules = schedules_from_snapshot(value),
            Feed::AccessLogs => {
                self.access_logs = access_logs_from_snapshot(value);
                self.logs_pager.clamp(self.access_logs.len());
            }
            Feed::DoorLocks => self.door_locks = door_locks_from_snapshot(value),
            Feed::AccessMode => self.access_mode = AccessMode::from_value(value),
        }
    }

    /// Create or update a user.
    ///
    /// `original_id` is the key the user was loaded from when editing.
    pub fn save_user(&mut self, user: User, original_id: Option<String>) {
        let taken = self
            .users
            .iter()
            .any(|u| u.id == user.id && original_id.as_deref() != Some(u.id.as_str()));
        if taken {
            self.error_message = Some(format!("A user with RFID '{}' already exists", user.id));
            return;
        }

        let db = self.db.clone();
        let sender = self.sender.clone();

        self.rt.spawn(async move {
            let added = original_id.is_none();
            let result = match &original_id {
                Some(old_id) => db::users::replace(&db, old_id, &user).await,
                None => db::users::save(&db, &user).await,
            };
            match result {
                Ok(()) => sender.send(UiMessage::UserSaved { added }),
                Err(e) => sender.send(UiMessage::OperationFailed(e.to_string())),
            }
        });
    }

    /// Delete a user.
    pub fn delete_user(&mut self, id: String) {
        let db = self.db.clone();
        let sender = self.sender.clone();

        self.rt.spawn(async move {
            match db::users::delete(&db, &id).await {
                Ok(()) => sender.send(UiMessage::UserDeleted),
                Err(e) => sender.send(UiMessage::OperationFailed(e.to_string())),
            }
        });
    }

    /// Create or update a schedule.
    ///
    /// `original` is the lab and batch the schedule was loaded from when editing.
    pub fn save_schedule(&mut self, schedule: Schedule, original: Option<(String, String)>) {
        let taken = self.schedules.iter().any(|s| {
            s.lab_name == schedule.lab_name
                && s.batch == schedule.batch
                && original.as_ref() != Some(&(s.lab_name.clone(), s.batch.clone()))
        });
        if taken {
            self.error_message = Some(format!(
                "A schedule for lab '{}' and batch '{}' already exists",
                schedule.lab_name, schedule.batch
            ));
            return;
        }

        let db = self.db.clone();
        let sender = self.sender.clone();

        self.rt.spawn(async move {
            let added = original.is_none();
            let result = match &original {
                Some((lab, batch)) => db::schedules::replace(&db, lab, batch, &schedule).await,
                None => db::schedules::save(&db, &schedule).await,
            };
            match result {
                Ok(()) => sender.send(UiMessage::ScheduleSaved { added }),
                Err(e) => sender.send(UiMessage::OperationFailed(e.to_string())),
            }
        });
    }

    /// Delete a schedule.
    pub fn delete_schedule(&mut self, lab: String, batch: String) {
        let db = self.db.clone();
        let sender = self.sender.clone();

        self.rt.spawn(async move {
            match db::schedules::delete(&db, &lab, &batch).await {
                Ok(()) => sender.send(UiMessage::ScheduleDeleted),
                Err(e) => sender.send(UiMessage::OperationFailed(e.to_string())),
            }
        });
    }

    /// Flip a lab door; the table shows the new state before the write lands.
    pub fn toggle_lock(&mut self, lab: &str) {
        let Some(door) = self.door_locks.iter_mut().find(|d| d.lab == lab) else {
            return;
        };
        let previous = door.state;
        door.state = previous.toggled();
        let next = door.state;

        let db = self.db.clone();
        let sender = self.sender.clone();
        let lab = lab.to_string();

        self.rt.spawn(async move {
            if let Err(e) = db::door_lock::set_lock_state(&db, &lab, next).await {
                sender.send(UiMessage::LockWriteFailed {
                    lab,
                    previous,
                    error: e.to_string(),
                });
            }
        });
    }

    /// Flip between manual and automatic mode, optimistically.
    pub fn toggle_access_mode(&mut self) {
        if !self.feed_ready(Feed::AccessMode) {
            return;
        }
        let previous = self.access_mode;
        self.access_mode = previous.toggled();
        let next = self.access_mode;

        let db = self.db.clone();
        let sender = self.sender.clone();

        self.rt.spawn(async move {
            if let Err(e) = db::door_lock::set_access_mode(&db, next).await {
                sender.send(UiMessage::ModeWriteFailed {
                    previous,
                    error: e.to_string(),
                });
            }
        });
    }

    /// Export users to Excel.
    pub fn export_users(&mut self) {
        let users: Vec<User> = self
            .users
            .iter()
            .filter(|u| u.matches(&self.user_search))
            .cloned()
            .collect();
        if users.is_empty() {
            self.error_message = Some("No users to export".to_string());
            return;
        }

        let filename = crate::export::generate_export_filename("users");
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };

        match crate::export::export_users_to_excel(&users, &path) {
            Ok(()) => {
                info!("Exported {} users to {}", users.len(), path.display());
                self.success_message = Some(format!("Exported to: {}", path.display()));
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.error_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Export access logs to Excel.
    pub fn export_access_logs(&mut self) {
        if self.access_logs.is_empty() {
            self.error_message = Some("No access logs to export".to_string());
            return;
        }

        let filename = crate::export::generate_export_filename("access_logs");
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };

        match crate::export::export_access_logs_to_excel(&self.access_logs, &path) {
            Ok(()) => {
                info!("Exported {} access logs to {}", self.access_logs.len(), path.display());
                self.success_message = Some(format!("Exported to: {}", path.display()));
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.error_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::SignedIn(session) => self.on_signed_in(session),
                UiMessage::SignInFailed(e) => {
                    warn!("Sign-in failed: {}", e);
                    self.login.in_progress = false;
                    self.login.error = Some(login::error_message(&e));
                }
                UiMessage::TokenRefreshed(session) => {
                    self.refreshing = false;
                    self.refresh_retry_at = None;
                    if self.session.is_none() {
                        continue;
                    }
                    if !session.is_admin() {
                        self.logout();
                        self.login.error = Some(login::error_message(&AppError::NotAdmin));
                        continue;
                    }
                    self.db.set_auth(Some(session.id_token.clone()));
                    self.session = Some(session);
                    self.subscribe_current_tab();
                }
                UiMessage::RefreshFailed(e) => {
                    self.refreshing = false;
                    if self.session.is_none() {
                        continue;
                    }
                    let expired = self
                        .session
                        .as_ref()
                        .is_some_and(|session| session.expires_at <= Utc::now());
                    if e.requires_sign_in() || expired {
                        error!("Token refresh failed: {}", e);
                        self.logout();
                        self.login.error = Some(e.to_string());
                    } else {
                        warn!("Token refresh failed, retrying: {}", e);
                        self.refresh_retry_at = Some(Utc::now() + REFRESH_RETRY_DELAY);
                    }
                }
                UiMessage::Feed {
                    feed,
                    generation,
                    update,
                } => {
                    // Updates queued by a dropped subscription
                    if generation != self.generation {
                        continue;
                    }
                    self.on_feed_update(feed, update);
                }
                UiMessage::UserSaved { added } => {
                    self.user_form.reset();
                    self.success_message = Some(if added {
                        "User added successfully!".to_string()
                    } else {
                        "User updated successfully!".to_string()
                    });
                }
                UiMessage::UserDeleted => {
                    self.success_message = Some("User deleted successfully!".to_string());
                }
                UiMessage::ScheduleSaved { added } => {
                    self.schedule_form.reset();
                    self.success_message = Some(if added {
                        "Schedule added successfully!".to_string()
                    } else {
                        "Schedule updated successfully!".to_string()
                    });
                }
                UiMessage::ScheduleDeleted => {
                    self.success_message = Some("Schedule deleted successfully!".to_string());
                }
                UiMessage::LockWriteFailed { lab, previous, error } => {
                    // Only revert if nothing newer arrived meanwhile
                    if let Some(door) = self.door_locks.iter_mut().find(|d| d.lab == lab)
                        && door.state == previous.toggled()
                    {
                        door.state = previous;
                    }
                    error!("Failed to set door {}: {}", lab, error);
                    self.error_message = Some(format!("Failed to update {}: {}", lab, error));
                }
                UiMessage::ModeWriteFailed { previous, error } => {
                    if self.access_mode == previous.toggled() {
                        self.access_mode = previous;
                    }
                    error!("Failed to set access mode: {}", error);
                    self.error_message = Some(format!("Failed to change access mode: {}", error));
                }
                UiMessage::OperationFailed(e) => {
                    error!("Operation failed: {}", e);
                    self.error_message = Some(e);
                }
            }
        }
    }

    /// Render header with brand, signed-in user and tabs.
    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(RichText::new("XIRTAM").strong().color(colors::PRIMARY));
                ui.label(RichText::new("RFID Based Access Control System").weak());

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if styled_button_with_icon(ui, SIGN_OUT, "Logout").clicked() {
                        self.logout();
                    }
                    if let Some(session) = &self.session {
                        ui.label(&session.email);
                    }
                });
            });
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    let label = format!("{} {}", tab.icon(), tab.name());
                    if ui.selectable_label(self.current_tab == tab, label).clicked() {
                        self.switch_tab(tab);
                    }
                    ui.add_space(6.0);
                }
            });
            ui.add_space(4.0);
        });
    }

    /// Render status bar.
    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let status = self.live_status();
                    let (color, text) = match &status {
                        LiveStatus::Idle => (colors::NEUTRAL, "Not subscribed".to_string()),
                        LiveStatus::Connecting => (colors::WARNING, "Connecting...".to_string()),
                        LiveStatus::Live => (colors::SUCCESS, "Live".to_string()),
                        LiveStatus::Closed(reason) => (colors::ERROR, format!("Disconnected: {}", reason)),
                    };

                    if matches!(status, LiveStatus::Connecting) {
                        ui.spinner();
                    }
                    ui.colored_label(color, text);

                    if matches!(status, LiveStatus::Closed(_))
                        && ui.small_button(format!("{} Refresh", ARROWS_CLOCKWISE)).clicked()
                    {
                        self.subscribe_current_tab();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(time) = self.last_update {
                            ui.label(format!("Last update: {}", time.format("%H:%M:%S")));
                        }
                    });
                });
            });
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if self.show_delete_confirm
            && let Some(ref target) = self.delete_target.clone()
        {
            let (title, message) = match target {
                DeleteTarget::User { name, .. } => ("Delete User", format!("Delete user '{}'?", name)),
                DeleteTarget::Schedule { lab, batch } => (
                    "Delete Schedule",
                    format!("Delete the schedule of batch '{}' in '{}'?", batch, lab),
                ),
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Delete").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        if let Some(target) = self.delete_target.take() {
            match target {
                DeleteTarget::User { id, name } => {
                    info!("Deleting user: {} ({})", name, id);
                    self.delete_user(id);
                }
                DeleteTarget::Schedule { lab, batch } => {
                    info!("Deleting schedule: {}-{}", lab, batch);
                    self.delete_schedule(lab, batch);
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();
        self.check_token_refresh();

        if self.screen == Screen::Admin {
            ctx.request_repaint_after(REFRESH_CHECK_INTERVAL);
        }

        // Modal dialogs (error, success, delete confirmation)
        self.show_dialogs(ctx);

        match self.screen {
            Screen::Login => {
                egui::CentralPanel::default().show(ctx, |ui| login::show(self, ui));
            }
            Screen::Admin => {
                self.show_header(ctx);
                self.show_status_bar(ctx);

                egui::CentralPanel::default().show(ctx, |ui| match self.current_tab {
                    Tab::Users => users_panel::show(self, ui),
                    Tab::Schedules => schedules_panel::show(self, ui),
                    Tab::AccessLogs => access_logs_panel::show(self, ui),
                    Tab::DoorLock => door_lock_panel::show(self, ui),
                });
            }
        }
    }
}
