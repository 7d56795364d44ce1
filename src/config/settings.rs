//! User settings and preferences for PixelMark
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence. The layout follows the
//! config file: `editor`, `preview`, `general` and `ai` sections.

// Allow dead code - this module contains complete API with methods for UI display
// labels and settings that may not all be used yet but provide consistent API
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::ai::AiProfile;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the application chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// Get the display label for the settings dialog.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "浅色",
            Theme::Dark => "深色",
            Theme::System => "跟随系统",
        }
    }

    /// Get all available themes.
    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Device Width Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Simulated device widths for the preview pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceWidth {
    /// Phone frame, 375px content width
    Mobile,
    /// Tablet frame, 768px content width
    Tablet,
    /// Full pane width (default)
    #[default]
    Full,
}

impl DeviceWidth {
    /// Content width in pixels, or `None` for the full pane width.
    pub fn width(&self) -> Option<f32> {
        match self {
            DeviceWidth::Mobile => Some(375.0),
            DeviceWidth::Tablet => Some(768.0),
            DeviceWidth::Full => None,
        }
    }

    /// Get the tooltip label for the device toggle.
    pub fn label(&self) -> &'static str {
        match self {
            DeviceWidth::Mobile => "手机 (375px)",
            DeviceWidth::Tablet => "平板 (768px)",
            DeviceWidth::Full => "桌面 (100%)",
        }
    }

    /// Get the toggle button icon.
    pub fn icon(&self) -> &'static str {
        match self {
            DeviceWidth::Mobile => "📱",
            DeviceWidth::Tablet => "💻",
            DeviceWidth::Full => "🖥",
        }
    }

    /// Get all available device widths, in toggle order.
    pub fn all() -> &'static [DeviceWidth] {
        &[DeviceWidth::Mobile, DeviceWidth::Tablet, DeviceWidth::Full]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Section
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown editor behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Font size for the editor text (in points)
    pub font_size: f32,

    /// Whether to show line numbers in the editor gutter
    pub show_line_numbers: bool,

    /// Tab size (number of spaces inserted per indent)
    pub tab_size: u8,

    /// Whether to auto-save content after a pause in typing
    pub auto_save: bool,

    /// Auto-save interval in seconds (if auto_save is enabled)
    pub auto_save_interval_secs: u32,

    /// Whether pasted clipboard content is inserted as plain text
    pub paste_plain_text: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            show_line_numbers: false,
            tab_size: 2,
            auto_save: true,
            auto_save_interval_secs: 5,
            paste_plain_text: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Section
// ─────────────────────────────────────────────────────────────────────────────

/// Preview pane behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Id of the active article skin
    pub skin_id: String,

    /// Simulated device width for the preview
    pub device_width: DeviceWidth,

    /// Whether editor and preview scroll positions are kept in sync
    pub sync_scroll: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            skin_id: String::from("pixel"),
            device_width: DeviceWidth::default(),
            sync_scroll: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// General Section
// ─────────────────────────────────────────────────────────────────────────────

/// Application-wide options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Whether the bottom status bar is visible
    pub show_status_bar: bool,

    /// Whether keyboard shortcuts (Ctrl+S etc.) are active
    pub enable_shortcuts: bool,

    /// Color theme for the application chrome
    pub theme: Theme,

    /// Window size and position
    pub window_size: WindowSize,

    /// Split ratio for the editor/preview panes
    pub split_ratio: f32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            show_status_bar: true,
            enable_shortcuts: true,
            theme: Theme::default(),
            window_size: WindowSize::default(),
            split_ratio: 0.5,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AI Section
// ─────────────────────────────────────────────────────────────────────────────

/// The two AI request profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Profile for chat and auto-layout requests
    pub chat: AiProfile,

    /// Profile for image generation requests
    pub image: AiProfile,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            chat: AiProfile::default_chat(),
            image: AiProfile::default_image(),
        }
    }
}

impl AiSettings {
    /// Resolve the profile used for image generation.
    ///
    /// When the image profile has no key of its own, requests fall back to the
    /// chat profile's credentials, keeping the configured image model.
    pub fn image_request_profile(&self) -> AiProfile {
        if self.image.has_key() {
            return self.image.clone();
        }
        let mut profile = self.chat.clone();
        profile.image_model = if self.image.image_model.trim().is_empty() {
            String::from("gemini-2.5-flash-image")
        } else {
            self.image.image_model.clone()
        };
        profile
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Markdown editor behavior
    pub editor: EditorSettings,

    /// Preview pane behavior
    pub preview: PreviewSettings,

    /// Application-wide options
    pub general: GeneralSettings,

    /// AI request profiles
    pub ai: AiSettings,
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 32.0;
    /// Minimum allowed tab size.
    pub const MIN_TAB_SIZE: u8 = 1;
    /// Maximum allowed tab size.
    pub const MAX_TAB_SIZE: u8 = 8;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Minimum split ratio (editor pane share).
    pub const MIN_SPLIT_RATIO: f32 = 0.2;
    /// Maximum split ratio (editor pane share).
    pub const MAX_SPLIT_RATIO: f32 = 0.8;
    /// Minimum auto-save interval in seconds.
    pub const MIN_AUTO_SAVE_SECS: u32 = 5;
    /// Maximum model temperature.
    pub const MAX_TEMPERATURE: f32 = 2.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        // Clamp font size
        self.editor.font_size = self
            .editor
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        // Clamp tab size
        self.editor.tab_size = self
            .editor
            .tab_size
            .clamp(Self::MIN_TAB_SIZE, Self::MAX_TAB_SIZE);

        // Ensure auto-save interval is reasonable
        if self.editor.auto_save && self.editor.auto_save_interval_secs < Self::MIN_AUTO_SAVE_SECS {
            self.editor.auto_save_interval_secs = Self::MIN_AUTO_SAVE_SECS;
        }

        // Clamp window size
        self.general.window_size.width = self
            .general
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.general.window_size.height = self
            .general
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        // Clamp split ratio
        self.general.split_ratio = self
            .general
            .split_ratio
            .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO);

        // Clamp model temperatures
        self.ai.chat.temperature = self.ai.chat.temperature.clamp(0.0, Self::MAX_TEMPERATURE);
        self.ai.image.temperature = self.ai.image.temperature.clamp(0.0, Self::MAX_TEMPERATURE);
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
