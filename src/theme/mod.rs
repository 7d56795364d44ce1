//! Chrome theming for PixelMark
//!
//! These palettes style the application chrome only: window furniture,
//! panels, dialogs, the toolbar and the status bar. Article styling is a
//! separate concern handled by preview skins, so nothing here leaks into
//! the preview pane or the clipboard export.
//!
//! The `Theme` enum in `config::settings` (Light/Dark/System) selects which
//! palette is in effect; [`ThemeManager`] caches the derived `Visuals` and
//! re-applies them only when the selection or the system preference changes.

// Allow dead code - palette fields are consumed unevenly across the UI
#![allow(dead_code)]

pub mod dark;
pub mod light;
pub mod manager;

pub use manager::ThemeManager;

use eframe::egui::{self, Color32, Rounding, Stroke, Visuals};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// The full chrome palette for one theme variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    /// Backgrounds, borders and interaction states
    pub base: BaseColors,
    /// Text colors for various contexts
    pub text: TextColors,
    /// Accent and feedback colors
    pub ui: UiColors,
}

impl ThemeColors {
    /// Palette for the given theme setting. `System` resolves through the
    /// dark-mode flag of the visuals currently in effect.
    pub fn from_theme(theme: crate::config::Theme, visuals: &eframe::egui::Visuals) -> Self {
        match theme {
            crate::config::Theme::Dark => Self::dark(),
            crate::config::Theme::Light => Self::light(),
            crate::config::Theme::System => {
                if visuals.dark_mode {
                    Self::dark()
                } else {
                    Self::light()
                }
            }
        }
    }

    pub fn light() -> Self {
        Self {
            base: BaseColors::light(),
            text: TextColors::light(),
            ui: UiColors::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            base: BaseColors::dark(),
            text: TextColors::dark(),
            ui: UiColors::dark(),
        }
    }

    /// Whether this palette is a dark one.
    pub fn is_dark(&self) -> bool {
        self.base.background.r() < 128
    }

    /// Convert the palette into egui `Visuals`.
    pub fn to_visuals(&self) -> Visuals {
        if self.is_dark() {
            dark::create_dark_visuals()
        } else {
            light::create_light_visuals()
        }
    }

    /// `from_theme` and `to_visuals` in one step.
    pub fn visuals_for_theme(
        theme: crate::config::Theme,
        system_visuals: &eframe::egui::Visuals,
    ) -> Visuals {
        Self::from_theme(theme, system_visuals).to_visuals()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Base Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Backgrounds, borders and interaction-state fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseColors {
    /// Primary background
    pub background: Color32,
    /// Elevated background (panels, cards)
    pub background_secondary: Color32,
    /// Recessed background (inputs, code)
    pub background_tertiary: Color32,
    /// Primary border
    pub border: Color32,
    /// Subtle border (dividers)
    pub border_subtle: Color32,
    /// Hover fill
    pub hover: Color32,
    /// Selected/active fill
    pub selected: Color32,
}

impl BaseColors {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(255, 255, 255),
            background_secondary: Color32::from_rgb(249, 250, 251),
            background_tertiary: Color32::from_rgb(243, 244, 246),
            border: Color32::from_rgb(209, 213, 219),
            border_subtle: Color32::from_rgb(229, 231, 235),
            hover: Color32::from_rgb(243, 244, 246),
            selected: Color32::from_rgb(223, 245, 232),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(24, 24, 27),
            background_secondary: Color32::from_rgb(31, 31, 35),
            background_tertiary: Color32::from_rgb(39, 39, 42),
            border: Color32::from_rgb(63, 63, 70),
            border_subtle: Color32::from_rgb(50, 50, 56),
            hover: Color32::from_rgb(45, 45, 50),
            selected: Color32::from_rgb(22, 52, 38),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Text colors for various contexts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    /// Main content
    pub primary: Color32,
    /// Descriptions, labels
    pub secondary: Color32,
    /// Hints, placeholders
    pub muted: Color32,
    /// Disabled controls
    pub disabled: Color32,
    /// Links
    pub link: Color32,
    /// Monospace text (CSS editors, shortcut hints)
    pub code: Color32,
}

impl TextColors {
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(31, 41, 55),
            secondary: Color32::from_rgb(75, 85, 99),
            muted: Color32::from_rgb(156, 163, 175),
            disabled: Color32::from_rgb(209, 213, 219),
            link: Color32::from_rgb(37, 99, 235),
            code: Color32::from_rgb(55, 65, 81),
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(228, 228, 231),
            secondary: Color32::from_rgb(161, 161, 170),
            muted: Color32::from_rgb(113, 113, 122),
            disabled: Color32::from_rgb(82, 82, 91),
            link: Color32::from_rgb(96, 165, 250),
            code: Color32::from_rgb(212, 212, 216),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Accent and feedback colors.
///
/// The accent is the WeChat brand green; `success`/`warning` double as the
/// saved/unsaved indicators in the status bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiColors {
    /// Primary accent (buttons, active elements)
    pub accent: Color32,
    /// Accent hover state
    pub accent_hover: Color32,
    /// Positive feedback, saved indicator
    pub success: Color32,
    /// Cautions, unsaved indicator, word-limit overrun
    pub warning: Color32,
    /// Errors, destructive actions
    pub error: Color32,
    /// Informational messages
    pub info: Color32,
}

impl UiColors {
    pub fn light() -> Self {
        Self {
            accent: Color32::from_rgb(7, 193, 96),
            accent_hover: Color32::from_rgb(6, 174, 86),
            success: Color32::from_rgb(22, 163, 74),
            warning: Color32::from_rgb(249, 115, 22),
            error: Color32::from_rgb(220, 38, 38),
            info: Color32::from_rgb(8, 145, 178),
        }
    }

    pub fn dark() -> Self {
        Self {
            accent: Color32::from_rgb(7, 193, 96),
            accent_hover: Color32::from_rgb(54, 211, 128),
            success: Color32::from_rgb(74, 222, 128),
            warning: Color32::from_rgb(251, 146, 60),
            error: Color32::from_rgb(248, 113, 113),
            info: Color32::from_rgb(34, 211, 238),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Spacing
// ─────────────────────────────────────────────────────────────────────────────

/// Standard spacing steps used across the chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSpacing {
    /// Extra small spacing (2px)
    pub xs: f32,
    /// Small spacing (4px)
    pub sm: f32,
    /// Medium spacing (8px)
    pub md: f32,
    /// Large spacing (16px)
    pub lg: f32,
    /// Extra large spacing (24px)
    pub xl: f32,
}

impl Default for ThemeSpacing {
    fn default() -> Self {
        Self {
            xs: 2.0,
            sm: 4.0,
            md: 8.0,
            lg: 16.0,
            xl: 24.0,
        }
    }
}

impl ThemeSpacing {
    pub fn new() -> Self {
        Self::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared Visuals Wiring
// ─────────────────────────────────────────────────────────────────────────────

/// Write a palette into egui `Visuals`.
///
/// Both theme constructors route through here; only shadow depth and the
/// `dark_mode` flag stay with the per-theme code.
pub(crate) fn apply_palette(visuals: &mut Visuals, colors: &ThemeColors) {
    let spacing = ThemeSpacing::default();
    let rounding = Rounding::same(spacing.sm);

    visuals.panel_fill = colors.base.background;
    visuals.window_fill = colors.base.background;
    visuals.extreme_bg_color = colors.base.background_tertiary;
    visuals.faint_bg_color = colors.base.background_secondary;
    visuals.code_bg_color = colors.base.background_tertiary;

    visuals.override_text_color = None;
    visuals.warn_fg_color = colors.ui.warning;
    visuals.error_fg_color = colors.ui.error;
    visuals.hyperlink_color = colors.text.link;

    visuals.selection.bg_fill = colors.base.selected;
    visuals.selection.stroke = Stroke::new(1.0, colors.ui.accent);

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_fill = colors.base.background_secondary;
    widgets.noninteractive.weak_bg_fill = colors.base.background_tertiary;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.base.border_subtle);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text.primary);

    widgets.inactive.bg_fill = colors.base.background_secondary;
    widgets.inactive.weak_bg_fill = colors.base.background_tertiary;
    widgets.inactive.bg_stroke = Stroke::new(1.0, colors.base.border);
    widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text.secondary);

    widgets.hovered.bg_fill = colors.base.hover;
    widgets.hovered.weak_bg_fill = colors.base.hover;
    widgets.hovered.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    widgets.hovered.fg_stroke = Stroke::new(1.5, colors.text.primary);

    widgets.active.bg_fill = colors.ui.accent;
    widgets.active.weak_bg_fill = colors.base.selected;
    widgets.active.bg_stroke = Stroke::new(1.0, colors.ui.accent_hover);
    widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);

    widgets.open.bg_fill = colors.base.selected;
    widgets.open.weak_bg_fill = colors.base.selected;
    widgets.open.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    widgets.open.fg_stroke = Stroke::new(1.0, colors.text.primary);

    for w in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        w.rounding = rounding;
    }

    visuals.window_rounding = Rounding::same(spacing.md);
    visuals.window_stroke = Stroke::new(1.0, colors.base.border);
    visuals.menu_rounding = rounding;

    visuals.resize_corner_size = 12.0;
    visuals.button_frame = true;
    visuals.collapsing_header_frame = false;
    visuals.striped = true;
    visuals.slider_trailing_fill = true;
    visuals.interact_cursor = Some(egui::CursorIcon::PointingHand);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
