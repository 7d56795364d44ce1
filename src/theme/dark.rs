//! Dark chrome theme
//!
//! Converts [`ThemeColors::dark`] into egui `Visuals`. The widget wiring is
//! shared with the light theme; shadows are deeper here so elevated surfaces
//! still read as layers on a dark background.

use eframe::egui::{self, Color32, Visuals};

use super::{apply_palette, ThemeColors};

/// egui Visuals for the dark chrome theme.
pub fn create_dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();
    apply_palette(&mut visuals, &ThemeColors::dark());

    visuals.window_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 4.0),
        blur: 16.0,
        spread: 0.0,
        color: Color32::from_black_alpha(80),
    };
    visuals.popup_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 6.0),
        blur: 20.0,
        spread: 0.0,
        color: Color32::from_black_alpha(100),
    };

    visuals.dark_mode = true;
    visuals
}
