//! Admin sign-in screen.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::SIGN_IN;

use super::app::App;
use super::components::{colors, primary_button_with_icon};
use crate::error::AppError;

/// Login form state.
#[derive(Default, Clone)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub in_progress: bool,
}

/// Text shown under the form for a failed sign-in.
pub fn error_message(error: &AppError) -> String {
    match error {
        AppError::InvalidCredentials => "Invalid credentials. Please try again.".to_string(),
        AppError::NotAdmin => "This account does not have admin access.".to_string(),
        AppError::Auth(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Show the login screen.
pub fn show(app: &mut App, ui: &mut Ui) {
    let mut submit = false;

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.15);

        ui.heading(RichText::new("XIRTAM").size(36.0).strong().color(colors::PRIMARY));
        ui.label(RichText::new("RFID Based Access Control System").weak());
        ui.add_space(30.0);

        egui::Frame::group(ui.style()).inner_margin(20.0).show(ui, |ui| {
            ui.set_max_width(320.0);
            ui.heading("Admin Login");
            ui.add_space(15.0);

            let busy = app.login.in_progress;

            egui::Grid::new("login_grid")
                .num_columns(2)
                .spacing([12.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Email:");
                    ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut app.login.email)
                            .desired_width(220.0)
                            .hint_text("admin@example.com"),
                    );
                    ui.end_row();

                    ui.label("Password:");
                    let response = ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut app.login.password)
                            .desired_width(220.0)
                            .password(true),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();
                });

            ui.add_space(10.0);
            ui.checkbox(&mut app.config.ui.remember_email, "Remember email");
            ui.add_space(15.0);

            if busy {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Signing in...");
                });
            } else if primary_button_with_icon(ui, SIGN_IN, "Login").clicked() {
                submit = true;
            }

            if let Some(error) = &app.login.error {
                ui.add_space(10.0);
                ui.colored_label(colors::ERROR, error);
            }
        });
    });

    if submit && !app.login.in_progress {
        app.sign_in();
    }
}
