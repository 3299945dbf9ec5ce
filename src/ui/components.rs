//! Shared UI components.

use eframe::egui::{self, Color32, Response, RichText, Ui};

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(0x44, 0x72, 0xC4);
    pub const DANGER: Color32 = Color32::from_rgb(200, 60, 60);
}

fn with_icon(icon: &str, label: &str) -> String {
    if icon.is_empty() {
        label.to_string()
    } else {
        format!("{icon} {label}")
    }
}

/// Render a panel header with title and subtitle.
pub fn panel_header(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.heading(RichText::new(title).size(24.0));
    if !subtitle.is_empty() {
        ui.label(RichText::new(subtitle).weak());
    }
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);
}

/// Plain toolbar button.
pub fn styled_button(ui: &mut Ui, label: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(label).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

/// Toolbar button with a leading icon.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, label: &str) -> Response {
    styled_button(ui, &with_icon(icon, label))
}

/// Filled button for the main action of a view.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, label: &str) -> Response {
    ui.add(
        egui::Button::new(RichText::new(with_icon(icon, label)).size(14.0).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(80.0, 28.0)),
    )
}

/// Small per-row action button.
pub fn action_button(ui: &mut Ui, icon: &str, hover: &str) -> Response {
    ui.add(egui::Button::new(icon).small()).on_hover_text(hover)
}

/// Small per-row button for destructive actions.
pub fn danger_action_button(ui: &mut Ui, icon: &str, hover: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).color(colors::DANGER)).small())
        .on_hover_text(hover)
}

/// Centered placeholder for empty tables.
pub fn empty_state(ui: &mut Ui, message: &str) {
    ui.add_space(20.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(message).weak());
    });
}
