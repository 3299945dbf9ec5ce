//! Manual door lock control.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{CALENDAR_CHECK, LOCK, LOCK_OPEN, TOGGLE_LEFT, TOGGLE_RIGHT};

use super::app::{App, Feed};
use super::components::{colors, empty_state, panel_header, styled_button_with_icon};
use crate::models::{AccessMode, LockState};

/// Show the door lock panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Manual Door Lock", "");

    ui.vertical_centered(|ui| {
        let icon = match app.access_mode {
            AccessMode::Manual => TOGGLE_RIGHT,
            AccessMode::Automatic => TOGGLE_LEFT,
        };
        // The stored mode is unknown until its feed delivers
        let ready = app.feed_ready(Feed::AccessMode);
        let clicked = ui
            .add_enabled_ui(ready, |ui| styled_button_with_icon(ui, icon, app.access_mode.switch_label()))
            .inner
            .clicked();
        if clicked {
            app.toggle_access_mode();
        }
    });

    ui.add_space(20.0);

    match app.access_mode {
        AccessMode::Manual => show_table(app, ui),
        AccessMode::Automatic => {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(RichText::new(CALENDAR_CHECK).size(64.0).color(colors::PRIMARY));
                ui.add_space(10.0);
                ui.label("Automatic mode is on. Doors follow the lab schedules.");
            });
        }
    }
}

fn show_table(app: &mut App, ui: &mut Ui) {
    if app.is_loading() && app.door_locks.is_empty() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading labs...");
        });
        return;
    }

    if app.door_locks.is_empty() {
        empty_state(ui, "No labs found");
        return;
    }

    let mut toggle = None;

    ScrollArea::vertical().id_salt("door_lock_scroll").show(ui, |ui| {
        egui::Grid::new("door_lock_grid")
            .num_columns(3)
            .striped(true)
            .min_col_width(120.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Lab Name");
                ui.strong("Status");
                ui.strong("Action");
                ui.end_row();

                for door in &app.door_locks {
                    ui.label(&door.lab);

                    let (color, icon) = match door.state {
                        LockState::Unlocked => (colors::SUCCESS, LOCK_OPEN),
                        LockState::Locked => (colors::ERROR, LOCK),
                    };
                    ui.colored_label(color, door.state.as_str());

                    let hover = match door.state {
                        LockState::Locked => "Unlock",
                        LockState::Unlocked => "Lock",
                    };
                    if ui
                        .button(RichText::new(icon).size(18.0).color(color))
                        .on_hover_text(hover)
                        .clicked()
                    {
                        toggle = Some(door.lab.clone());
                    }

                    ui.end_row();
                }
            });
    });

    if let Some(lab) = toggle {
        app.toggle_lock(&lab);
    }
}
