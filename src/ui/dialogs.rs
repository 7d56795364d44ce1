//! Confirmation, alert and toast overlays.
//!
//! Destructive actions route through the confirmation dialog (the pending
//! action itself lives in `AppState`); failures the user must acknowledge
//! use the blocking alert; transient feedback uses the toast pill.

use eframe::egui::{self, Color32, Key, RichText};

/// What the user chose in a confirmation dialog this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    /// Dialog still open
    None,
    Confirmed,
    Cancelled,
}

/// Dim the screen behind a modal and swallow clicks.
///
/// Returns `true` if the overlay itself was clicked, for dialogs that close
/// on an outside click.
pub(crate) fn modal_overlay(ctx: &egui::Context, id: &str, is_dark: bool) -> bool {
    let screen_rect = ctx.screen_rect();
    let overlay_color = if is_dark {
        Color32::from_rgba_unmultiplied(0, 0, 0, 180)
    } else {
        Color32::from_rgba_unmultiplied(0, 0, 0, 120)
    };

    let mut clicked = false;
    egui::Area::new(egui::Id::new(id))
        .order(egui::Order::Middle)
        .fixed_pos(screen_rect.min)
        .show(ctx, |ui| {
            let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
            ui.painter().rect_filled(screen_rect, 0.0, overlay_color);
            clicked = response.clicked();
        });
    clicked
}

/// Show the confirmation dialog for a destructive action.
///
/// Escape cancels, Enter confirms. An outside click is ignored so the
/// choice is always explicit.
pub fn show_confirm_dialog(ctx: &egui::Context, message: &str, is_dark: bool) -> ConfirmChoice {
    if ctx.input(|i| i.key_pressed(Key::Escape)) {
        return ConfirmChoice::Cancelled;
    }

    modal_overlay(ctx, "confirm_overlay", is_dark);

    let mut choice = ConfirmChoice::None;
    egui::Window::new("确认操作")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_min_width(320.0);

            ui.add_space(8.0);
            ui.label(message);
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // All confirmed actions here are destructive
                    let confirm_button =
                        egui::Button::new(RichText::new("确定").color(Color32::WHITE))
                            .fill(Color32::from_rgb(220, 38, 38));
                    if ui.add(confirm_button).clicked()
                        || ctx.input(|i| i.key_pressed(Key::Enter))
                    {
                        choice = ConfirmChoice::Confirmed;
                    }

                    ui.add_space(8.0);

                    if ui.button("取消").clicked() {
                        choice = ConfirmChoice::Cancelled;
                    }
                });
            });

            ui.add_space(4.0);
        });

    choice
}

/// Show a blocking alert. Returns `true` once the user acknowledges it.
pub fn show_alert_dialog(ctx: &egui::Context, message: &str, is_dark: bool) -> bool {
    modal_overlay(ctx, "alert_overlay", is_dark);

    let mut dismissed = false;
    egui::Window::new("提示")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_min_width(300.0);

            ui.add_space(8.0);
            ui.label(message);
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("确定").clicked()
                        || ctx.input(|i| i.key_pressed(Key::Enter) || i.key_pressed(Key::Escape))
                    {
                        dismissed = true;
                    }
                });
            });

            ui.add_space(4.0);
        });

    dismissed
}

/// Draw the toast pill at the bottom center of the window.
///
/// Expiry is handled by the caller; this only paints.
pub fn show_toast(ctx: &egui::Context, message: &str) {
    egui::Area::new(egui::Id::new("toast"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -48.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(Color32::from_rgba_unmultiplied(17, 24, 39, 235))
                .rounding(egui::Rounding::same(6.0))
                .inner_margin(egui::Margin::symmetric(16.0, 10.0))
                .show(ui, |ui| {
                    ui.label(RichText::new(message).color(Color32::WHITE).size(13.0));
                });
        });
}
