//! User management panel with add, edit, delete, search and export.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{FILE_XLS, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, colors, danger_action_button, empty_state, panel_header, primary_button_with_icon, styled_button,
    styled_button_with_icon,
};
use super::forms::UserForm;
use crate::models::user::status;

/// Show the users panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Manage Users", "All the students registered to the system are shown here");

    // Toolbar
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Student").clicked() {
            app.user_form = UserForm::new();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
            app.export_users();
        }

        ui.add_space(20.0);

        ui.label("Search:");
        ui.add(
            egui::TextEdit::singleline(&mut app.user_search)
                .desired_width(200.0)
                .hint_text("Name, email, RFID or batch..."),
        );

        if !app.user_search.is_empty() {
            ui.add_space(10.0);
            if styled_button(ui, "Clear").clicked() {
                app.user_search.clear();
            }
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    // Form dialog
    if app.user_form.is_open {
        show_form_dialog(app, ui.ctx());
    }
}

fn show_table(app: &mut App, ui: &mut Ui) {
    if app.is_loading() && app.users.is_empty() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading users...");
        });
        return;
    }

    if app.users.is_empty() {
        empty_state(ui, "No users available.");
        return;
    }

    let filtered: Vec<_> = app.users.iter().filter(|u| u.matches(&app.user_search)).collect();

    ui.label(format!("Showing {} of {} users", filtered.len(), app.users.len()));
    ui.add_space(10.0);

    let mut edit = None;
    let mut delete = None;

    ScrollArea::vertical().id_salt("users_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("users_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                // Header
                ui.strong("Name");
                ui.strong("Email");
                ui.strong("Batch");
                ui.strong("RFID");
                ui.strong("Status");
                ui.strong("Action");
                ui.end_row();

                for user in &filtered {
                    ui.label(&user.name);
                    ui.label(&user.email);
                    ui.label(&user.batch);
                    ui.label(&user.id);

                    let color = if user.status == status::ALLOWED {
                        colors::SUCCESS
                    } else {
                        colors::ERROR
                    };
                    ui.colored_label(color, if user.status.is_empty() { "-" } else { user.status.as_str() });

                    ui.horizontal(|ui| {
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            edit = Some(UserForm::edit(user));
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            delete = Some(DeleteTarget::User {
                                id: user.id.clone(),
                                name: user.name.clone(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });

        if filtered.is_empty() {
            empty_state(ui, "No users match the search.");
        }
    });

    if let Some(form) = edit {
        app.user_form = form;
    }
    if let Some(target) = delete {
        app.delete_target = Some(target);
        app.show_delete_confirm = true;
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let (title, submit_label) = if app.user_form.is_editing {
        ("Edit User", "Update User")
    } else {
        ("Add New User", "Add User")
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("user_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut app.user_form.name).desired_width(250.0));
                    ui.end_row();

                    ui.label("Email:");
                    ui.add(egui::TextEdit::singleline(&mut app.user_form.email).desired_width(250.0));
                    ui.end_row();

                    ui.label("RFID:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.user_form.rfid)
                            .desired_width(200.0)
                            .hint_text("Tag ID"),
                    );
                    ui.end_row();

                    ui.label("Batch:");
                    ui.add(egui::TextEdit::singleline(&mut app.user_form.batch).desired_width(120.0));
                    ui.end_row();

                    ui.label("Status:");
                    egui::ComboBox::from_id_salt("user_form_status")
                        .width(150.0)
                        .selected_text(app.user_form.status.as_str())
                        .show_ui(ui, |ui| {
                            for value in status::ALL {
                                ui.selectable_value(&mut app.user_form.status, value.to_string(), value);
                            }
                        });
                    ui.end_row();
                });

            if app.user_form.is_editing
                && let Some(original) = &app.user_form.original_id
                && original != app.user_form.rfid.trim()
            {
                ui.add_space(8.0);
                ui.colored_label(
                    colors::WARNING,
                    format!("The record will move from RFID '{original}' to the new tag."),
                );
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.user_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", submit_label).clicked() {
                        save_user(app);
                    }
                });
            });
        });
}

fn save_user(app: &mut App) {
    match app.user_form.validate() {
        Ok(user) => {
            let original_id = app.user_form.original_id.clone();
            app.save_user(user, original_id);
        }
        Err(e) => {
            app.error_message = Some(e.to_string());
        }
    }
}
