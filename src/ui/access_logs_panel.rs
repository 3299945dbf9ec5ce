//! Read-only access log viewer with pagination and Excel export.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{CARET_DOUBLE_LEFT, CARET_DOUBLE_RIGHT, CARET_LEFT, CARET_RIGHT, FILE_XLS};

use super::app::App;
use super::components::{colors, empty_state, panel_header, styled_button_with_icon};
use crate::models::AccessLog;

/// Show the access logs panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(
        ui,
        "Access Logs",
        "This table contains the access logs of all students accessing the labs.",
    );

    let total = app.access_logs.len();

    ui.horizontal(|ui| {
        if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
            app.export_access_logs();
        }

        ui.add_space(20.0);

        let range = app.logs_pager.range(total);
        if total > 0 {
            ui.label(format!(
                "Showing {start}-{end} of {total} records",
                start = range.start + 1,
                end = range.end
            ));
        } else {
            ui.label("0 records");
        }

        // Pagination controls
        ui.add_space(20.0);
        ui.separator();
        ui.add_space(10.0);

        let pager = &mut app.logs_pager;

        if ui
            .add_enabled(pager.has_prev(), egui::Button::new(CARET_DOUBLE_LEFT))
            .on_hover_text("First page")
            .clicked()
        {
            pager.first();
        }

        if ui
            .add_enabled(pager.has_prev(), egui::Button::new(CARET_LEFT))
            .on_hover_text("Previous page")
            .clicked()
        {
            pager.prev();
        }

        ui.label(format!(
            "Page {page} of {pages}",
            page = pager.page + 1,
            pages = pager.total_pages(total).max(1)
        ));

        if ui
            .add_enabled(pager.has_next(total), egui::Button::new(CARET_RIGHT))
            .on_hover_text("Next page")
            .clicked()
        {
            pager.next(total);
        }

        if ui
            .add_enabled(pager.has_next(total), egui::Button::new(CARET_DOUBLE_RIGHT))
            .on_hover_text("Last page")
            .clicked()
        {
            pager.last(total);
        }
    });

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    if app.is_loading() && total == 0 {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading access logs...");
        });
        return;
    }

    if total == 0 {
        empty_state(ui, "No access logs recorded.");
        return;
    }

    let page = &app.access_logs[app.logs_pager.range(total)];
    show_table(page, ui);
}

fn timestamp_text(log: &AccessLog) -> String {
    match (log.time, log.timestamp.as_deref()) {
        (Some(time), _) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn show_table(logs: &[AccessLog], ui: &mut Ui) {
    ScrollArea::both().id_salt("access_logs_scroll").show(ui, |ui| {
        egui::Grid::new("access_logs_grid")
            .num_columns(4)
            .striped(true)
            .min_col_width(100.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("User ID");
                ui.strong("RFID");
                ui.strong("Timestamp");
                ui.strong("Status");
                ui.end_row();

                for log in logs {
                    ui.label(&log.user);
                    ui.label(if log.card_id.is_empty() { "-" } else { log.card_id.as_str() });
                    ui.label(timestamp_text(log));

                    let status = log.status.to_lowercase();
                    let color = if status.contains("grant") || status.contains("allow") {
                        colors::SUCCESS
                    } else if status.contains("den") || status.contains("not") {
                        colors::ERROR
                    } else {
                        ui.visuals().text_color()
                    };
                    ui.colored_label(color, &log.status);

                    ui.end_row();
                }
            });
    });
}
