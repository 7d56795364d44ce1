//! Light chrome theme
//!
//! Converts [`ThemeColors::light`] into egui `Visuals`. The widget wiring is
//! shared with the dark theme; this file only owns the light-specific parts
//! (base visuals and soft shadows).

use eframe::egui::{self, Color32, Visuals};

use super::{apply_palette, ThemeColors};

/// egui Visuals for the light chrome theme.
pub fn create_light_visuals() -> Visuals {
    let mut visuals = Visuals::light();
    apply_palette(&mut visuals, &ThemeColors::light());

    visuals.window_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 2.0),
        blur: 8.0,
        spread: 0.0,
        color: Color32::from_black_alpha(25),
    };
    visuals.popup_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 4.0),
        blur: 12.0,
        spread: 0.0,
        color: Color32::from_black_alpha(30),
    };

    visuals.dark_mode = false;
    visuals
}
