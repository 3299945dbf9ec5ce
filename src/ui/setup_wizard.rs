//! First-run setup wizard for configuration.

use std::path::PathBuf;
use std::sync::mpsc;

use crate::config::AppConfig;
use crate::db;
use eframe::egui::{self, RichText};

use super::components::colors;

/// Connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success,
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-2).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// Database reachability test state.
    pub db_test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Timeout input as string for text editing.
    timeout_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        Self::from_config(AppConfig::default())
    }

    /// Start from an existing (possibly invalid) configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            current_step: 0,
            timeout_input: config.firebase.request_timeout_secs.to_string(),
            config,
            db_test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true, // Welcome - always can proceed
            1 => {
                matches!(self.db_test_state, ConnectionTestState::Success) && self.config.validate().is_ok()
            }
            2 => true, // Confirmation
            _ => false,
        }
    }

    /// Get step title.
    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "Firebase Project",
            2 => "Confirmation",
            _ => "Setup",
        }
    }

    /// Total number of steps.
    const TOTAL_STEPS: usize = 3;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub rt: tokio::runtime::Runtime,
    config_path: PathBuf,
    db_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
}

impl SetupApp {
    pub fn new(
        wizard: SetupWizard,
        initial_error: Option<String>,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            wizard,
            initial_error,
            rt,
            config_path,
            db_test_rx: None,
        }
    }

    /// Probe the database URL asynchronously.
    fn start_db_test(&mut self) {
        let url = self.wizard.config.firebase.database_url.clone();
        let (tx, rx) = mpsc::channel();
        self.db_test_rx = Some(rx);
        self.wizard.db_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = db::test_connection(&url).await;
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.db_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.db_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.db_test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async test results
        self.poll_test_results();

        // Request repaint while testing
        if matches!(self.wizard.db_test_state, ConnectionTestState::Testing) {
            ctx.request_repaint();
        }

        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        // Main wizard panel
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("XIRTAM Admin Setup").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Step {} of {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                // Step title
                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                // Step content
                let needs_db_test = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        false
                    }
                    1 => show_firebase_step(ui, &mut self.wizard),
                    2 => {
                        show_confirmation_step(ui, &self.wizard, &self.config_path);
                        false
                    }
                    _ => false,
                };

                if needs_db_test {
                    self.start_db_test();
                }

                ui.add_space(30.0);
                ui.separator();

                // Navigation buttons
                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Back").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Get Started >"
                            } else {
                                "Next >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else if ui.button("Save & Exit").clicked() {
                            self.wizard.completed = true;
                        }
                    });
                });
            });
        });

        // Handle completion
        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Config saved to {:?}", self.config_path);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    self.initial_error = Some(format!("Failed to save config: {}", e));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Welcome to the XIRTAM admin console!");
    ui.add_space(10.0);
    ui.label("This wizard will help you configure the application.");
    ui.add_space(20.0);
    ui.label("You will need:");
    ui.add_space(5.0);
    ui.label("  - The Web API key of your Firebase project");
    ui.label("  - The URL of its Realtime Database");
    ui.label("  - An account with the admin role to sign in afterwards");
}

fn show_firebase_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    egui::Grid::new("firebase_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("API key:");
            ui.add(egui::TextEdit::singleline(&mut wizard.config.firebase.api_key).password(true));
            ui.end_row();

            ui.label("Database URL:");
            if ui
                .add(
                    egui::TextEdit::singleline(&mut wizard.config.firebase.database_url)
                        .hint_text("https://<project>-default-rtdb.firebaseio.com"),
                )
                .changed()
            {
                wizard.db_test_state = ConnectionTestState::NotTested;
            }
            ui.end_row();
        });

    ui.add_space(10.0);

    egui::CollapsingHeader::new("Advanced")
        .default_open(false)
        .show(ui, |ui| {
            egui::Grid::new("firebase_advanced_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Auth endpoint:");
                    ui.text_edit_singleline(&mut wizard.config.firebase.auth_url);
                    ui.end_row();

                    ui.label("Token endpoint:");
                    ui.text_edit_singleline(&mut wizard.config.firebase.token_url);
                    ui.end_row();

                    ui.label("Timeout (seconds):");
                    if ui.text_edit_singleline(&mut wizard.timeout_input).changed()
                        && let Ok(t) = wizard.timeout_input.parse()
                    {
                        wizard.config.firebase.request_timeout_secs = t;
                    }
                    ui.end_row();
                });
        });

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.db_test_state, ConnectionTestState::Testing);
        if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.db_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success => {
                ui.colored_label(colors::SUCCESS, "Database reachable!");
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(colors::ERROR, format!("Failed: {}", e));
            }
        }
    });

    // Validation feedback
    if let Err(e) = wizard.config.validate() {
        ui.add_space(10.0);
        ui.colored_label(colors::WARNING, e.to_string());
    }

    needs_test
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard, config_path: &std::path::Path) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    let firebase = &wizard.config.firebase;

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Firebase");
        ui.label(format!("  Database: {}", firebase.database_url));
        ui.label(format!("  API key: {}", mask(&firebase.api_key)));
        ui.label(format!("  Timeout: {} seconds", firebase.request_timeout_secs));
    });

    ui.add_space(20.0);
    ui.label(format!("Config file: {}", config_path.display()));
    ui.label("Click 'Save & Exit' to save and close the wizard.");
    ui.label("You will need to restart the application after setup.");
}

/// Show only the last four characters of a secret.
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("AIzaSyABCD1234"), "**********1234");
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_firebase_step_needs_successful_test() {
        let mut wizard = SetupWizard::new();
        wizard.current_step = 1;
        wizard.config.firebase.api_key = "key".to_string();
        assert!(!wizard.can_proceed());

        wizard.db_test_state = ConnectionTestState::Success;
        assert!(wizard.can_proceed());

        wizard.config.firebase.api_key.clear();
        assert!(!wizard.can_proceed());
    }
}
