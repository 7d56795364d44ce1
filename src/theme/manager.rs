//! Chrome theme manager
//!
//! Holds the current theme selection, caches the derived `Visuals` and
//! re-applies them to the egui context only when the selection changes or,
//! for the System setting, when the OS preference flips.

// Allow dead code - some accessors are only used from tests today
#![allow(dead_code)]

use eframe::egui::{Context, Visuals};
use log::{debug, info};

use super::{dark, light, ThemeColors};
use crate::config::Theme;

/// Manages theme state and applies themes to the egui context.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    /// Current theme setting (Light, Dark, or System)
    current_theme: Theme,
    /// Cached visuals for the current theme
    cached_visuals: Option<Visuals>,
    /// Whether the theme needs to be reapplied
    needs_apply: bool,
    /// Last observed OS dark-mode state, for the System setting
    last_system_dark_mode: Option<bool>,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            cached_visuals: None,
            needs_apply: true,
            last_system_dark_mode: None,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Change the selection. The context is updated on the next
    /// [`apply_if_needed`](Self::apply_if_needed) call.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.cached_visuals = None;
            self.needs_apply = true;
        }
    }

    pub fn needs_apply(&self) -> bool {
        self.needs_apply
    }

    /// Apply the current theme to the egui context unconditionally.
    pub fn apply(&mut self, ctx: &Context) {
        let visuals = self.get_or_create_visuals(ctx);
        ctx.set_visuals(visuals);
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
    }

    /// Apply the theme only when needed. Call once per frame; returns `true`
    /// if the context was updated.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if self.current_theme == Theme::System {
            let current_system_dark = ctx.style().visuals.dark_mode;
            if self.last_system_dark_mode != Some(current_system_dark) {
                self.last_system_dark_mode = Some(current_system_dark);
                self.cached_visuals = None;
                self.needs_apply = true;
                debug!("System dark mode changed to: {}", current_system_dark);
            }
        }

        if self.needs_apply {
            self.apply(ctx);
            true
        } else {
            false
        }
    }

    fn get_or_create_visuals(&mut self, ctx: &Context) -> Visuals {
        if let Some(ref visuals) = self.cached_visuals {
            return visuals.clone();
        }

        let visuals = match self.current_theme {
            Theme::Light => light::create_light_visuals(),
            Theme::Dark => dark::create_dark_visuals(),
            Theme::System => {
                let system_dark = ctx.style().visuals.dark_mode;
                self.last_system_dark_mode = Some(system_dark);
                if system_dark {
                    dark::create_dark_visuals()
                } else {
                    light::create_light_visuals()
                }
            }
        };

        self.cached_visuals = Some(visuals.clone());
        visuals
    }

    /// The chrome palette for the effective theme.
    pub fn colors(&self, ctx: &Context) -> ThemeColors {
        ThemeColors::from_theme(self.current_theme, &ctx.style().visuals)
    }

    /// Whether the effective theme is dark. For System this reflects the
    /// actual OS preference.
    pub fn is_dark(&self, ctx: &Context) -> bool {
        match self.current_theme {
            Theme::Dark => true,
            Theme::Light => false,
            Theme::System => ctx.style().visuals.dark_mode,
        }
    }

    /// Invalidate the cache so the next frame rebuilds and re-applies.
    pub fn refresh(&mut self) {
        self.cached_visuals = None;
        self.needs_apply = true;
        debug!("Theme refresh requested");
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_needs_apply() {
        let manager = ThemeManager::new(Theme::Dark);
        assert_eq!(manager.current_theme(), Theme::Dark);
        assert!(manager.needs_apply());
    }

    #[test]
    fn test_default_follows_config_default() {
        let manager = ThemeManager::default();
        assert_eq!(manager.current_theme(), Theme::default());
    }

    #[test]
    fn test_set_theme_invalidates() {
        let mut manager = ThemeManager::new(Theme::Light);
        manager.needs_apply = false;
        manager.cached_visuals = Some(Visuals::light());

        manager.set_theme(Theme::Dark);
        assert_eq!(manager.current_theme(), Theme::Dark);
        assert!(manager.needs_apply());
        assert!(manager.cached_visuals.is_none());
    }

    #[test]
    fn test_set_same_theme_is_noop() {
        let mut manager = ThemeManager::new(Theme::Light);
        manager.needs_apply = false;

        manager.set_theme(Theme::Light);
        assert!(!manager.needs_apply());
    }

    #[test]
    fn test_apply_clears_flag_and_caches() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::Dark);

        manager.apply(&ctx);
        assert!(!manager.needs_apply());
        assert!(manager.cached_visuals.is_some());
        assert!(ctx.style().visuals.dark_mode);
    }

    #[test]
    fn test_apply_if_needed_skips_when_clean() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::Light);

        assert!(manager.apply_if_needed(&ctx));
        assert!(!manager.apply_if_needed(&ctx));
    }

    #[test]
    fn test_system_theme_tracks_os_flip() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::System);

        ctx.set_visuals(Visuals::light());
        assert!(manager.apply_if_needed(&ctx));
        assert!(!ctx.style().visuals.dark_mode);

        // Simulate the OS switching to dark
        ctx.set_visuals(Visuals::dark());
        assert!(manager.apply_if_needed(&ctx));
        assert!(ctx.style().visuals.dark_mode);
    }

    #[test]
    fn test_refresh_invalidates_cache() {
        let mut manager = ThemeManager::new(Theme::Light);
        manager.needs_apply = false;
        manager.cached_visuals = Some(Visuals::light());

        manager.refresh();
        assert!(manager.needs_apply());
        assert!(manager.cached_visuals.is_none());
    }

    #[test]
    fn test_is_dark_resolves_system() {
        let ctx = Context::default();
        ctx.set_visuals(Visuals::dark());

        assert!(ThemeManager::new(Theme::Dark).is_dark(&ctx));
        assert!(!ThemeManager::new(Theme::Light).is_dark(&ctx));
        assert!(ThemeManager::new(Theme::System).is_dark(&ctx));
    }
}
