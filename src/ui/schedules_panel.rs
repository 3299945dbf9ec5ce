//! Lab schedule panel.

use chrono::NaiveTime;
use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::{PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, colors, danger_action_button, empty_state, panel_header, primary_button_with_icon, styled_button,
};
use super::forms::ScheduleForm;
use crate::models::schedule::status;

/// Show the schedules panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Manage Schedules", "All the lab schedules are shown here");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Schedule").clicked() {
            app.schedule_form = ScheduleForm::new();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.schedule_form.is_open {
        show_form_dialog(app, ui.ctx());
    }
}

fn show_table(app: &mut App, ui: &mut Ui) {
    if app.is_loading() && app.schedules.is_empty() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading schedules...");
        });
        return;
    }

    if app.schedules.is_empty() {
        empty_state(ui, "No schedules available.");
        return;
    }

    let mut edit = None;
    let mut delete = None;

    ScrollArea::vertical().id_salt("schedules_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("schedules_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Lab Name");
                ui.strong("Batch");
                ui.strong("Start");
                ui.strong("End");
                ui.strong("Status");
                ui.strong("Actions");
                ui.end_row();

                for schedule in &app.schedules {
                    ui.label(&schedule.lab_name);
                    ui.label(&schedule.batch);
                    ui.label(schedule.start_display());
                    ui.label(schedule.end_display());

                    let color = if schedule.window.status == status::ACTIVE {
                        colors::SUCCESS
                    } else {
                        colors::NEUTRAL
                    };
                    ui.colored_label(color, status::label(&schedule.window.status));

                    ui.horizontal(|ui| {
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            edit = Some(ScheduleForm::edit(schedule));
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            delete = Some(DeleteTarget::Schedule {
                                lab: schedule.lab_name.clone(),
                                batch: schedule.batch.clone(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(form) = edit {
        app.schedule_form = form;
    }
    if let Some(target) = delete {
        app.delete_target = Some(target);
        app.show_delete_confirm = true;
    }
}

/// Text field for an `HH:MM` time, red while it does not parse.
fn time_input(ui: &mut Ui, value: &mut String) {
    let valid = NaiveTime::parse_from_str(value.trim(), "%H:%M").is_ok();
    let text_color = if valid {
        ui.visuals().text_color()
    } else {
        colors::ERROR
    };
    ui.add(
        egui::TextEdit::singleline(value)
            .desired_width(60.0)
            .hint_text("HH:MM")
            .text_color(text_color),
    );
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let (title, submit_label) = if app.schedule_form.is_editing {
        ("Edit Schedule", "Update Schedule")
    } else {
        ("Add Schedule", "Add Schedule")
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let form = &mut app.schedule_form;

            egui::Grid::new("schedule_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Lab Name:");
                    ui.add(egui::TextEdit::singleline(&mut form.lab_name).desired_width(200.0));
                    ui.end_row();

                    ui.label("Batch:");
                    ui.add(egui::TextEdit::singleline(&mut form.batch).desired_width(120.0));
                    ui.end_row();

                    ui.label("Start:");
                    ui.horizontal(|ui| {
                        ui.add(DatePickerButton::new(&mut form.start_date).id_salt("schedule_start_date"));
                        time_input(ui, &mut form.start_time);
                    });
                    ui.end_row();

                    ui.label("End:");
                    ui.horizontal(|ui| {
                        ui.add(DatePickerButton::new(&mut form.end_date).id_salt("schedule_end_date"));
                        time_input(ui, &mut form.end_time);
                    });
                    ui.end_row();

                    ui.label("Status:");
                    egui::ComboBox::from_id_salt("schedule_form_status")
                        .width(150.0)
                        .selected_text(status::label(&form.status))
                        .show_ui(ui, |ui| {
                            for value in [status::ACTIVE, status::INACTIVE] {
                                ui.selectable_value(&mut form.status, value.to_string(), status::label(value));
                            }
                        });
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.schedule_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", submit_label).clicked() {
                        save_schedule(app);
                    }
                });
            });
        });
}

fn save_schedule(app: &mut App) {
    match app.schedule_form.validate() {
        Ok(schedule) => {
            let original = app.schedule_form.original.clone();
            app.save_schedule(schedule, original);
        }
        Err(e) => {
            app.error_message = Some(e.to_string());
        }
    }
}
