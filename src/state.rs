//! Application state management for PixelMark
//!
//! This module defines the central `AppState` struct that holds settings,
//! persisted user data (article content, drafts, skins, snippets, AI
//! history) and UI state such as the active modal and toast messages.

// Allow dead code - this module has many state management methods for future use
#![allow(dead_code)]

use crate::config::{
    load_config, load_user_data, save_config_silent, save_user_data_silent, Settings, UserData,
};
use crate::skin::SkinLibrary;
use log::{debug, info};

/// How long a toast notification stays visible, in seconds.
pub const TOAST_DURATION_SECS: f64 = 3.0;

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// Modal dialogs. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    None,
    Settings,
    Ai,
    Skins,
    Snippets,
}

/// Actions that need confirmation before execution.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Clear the AI chat history
    ClearChatHistory,
    /// Delete a snippet by id
    DeleteSnippet(String),
    /// Delete a custom skin by id
    DeleteSkin(String),
    /// Delete a draft by id
    DeleteDraft(String),
    /// Restore factory-default settings
    ResetSettings,
}

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Which modal dialog is open
    pub active_modal: Modal,
    /// Temporary toast message (shown over the workspace)
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
    /// Blocking alert the user must acknowledge
    pub alert_message: Option<String>,
    /// Whether a confirmation dialog is open
    pub show_confirm_dialog: bool,
    /// Message for the confirmation dialog
    pub confirm_dialog_message: String,
    /// Pending action after confirmation
    pub pending_action: Option<PendingAction>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state struct.
///
/// This struct holds all persistent state for the application:
/// - User settings (loaded from config)
/// - User data: article content, drafts, custom skins, snippets, AI history
/// - The runtime skin library (built-ins merged with stored customs)
/// - UI state (active modal, toasts, alerts)
#[derive(Debug)]
pub struct AppState {
    /// User settings (loaded from config)
    pub settings: Settings,
    /// Persisted user data
    pub user_data: UserData,
    /// Runtime skin library
    pub skins: SkinLibrary,
    /// UI-related state
    pub ui: UiState,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
    /// Whether user data has been modified and needs saving
    user_data_dirty: bool,
    /// Time of the last content edit (seconds since app start), for auto-save
    last_edit_at: Option<f64>,
}

impl AppState {
    /// Create a new AppState with settings and user data loaded from disk.
    ///
    /// Both files degrade to defaults when missing or corrupt. The skin
    /// library is rebuilt from the built-in catalog plus stored custom skins
    /// and favorite marks.
    pub fn new() -> Self {
        let settings = load_config();
        let user_data = load_user_data();
        let skins =
            SkinLibrary::with_custom(user_data.custom_skins.clone(), &user_data.favorite_skins);
        info!(
            "AppState initialized: skin '{}', {} custom skins, {} drafts",
            settings.preview.skin_id,
            skins.custom_count(),
            user_data.drafts.len()
        );

        Self {
            settings,
            user_data,
            skins,
            ui: UiState::default(),
            settings_dirty: false,
            user_data_dirty: false,
            last_edit_at: None,
        }
    }

    /// Create AppState from in-memory data (useful for testing).
    pub fn with_data(settings: Settings, user_data: UserData) -> Self {
        let skins =
            SkinLibrary::with_custom(user_data.custom_skins.clone(), &user_data.favorite_skins);
        Self {
            settings,
            user_data,
            skins,
            ui: UiState::default(),
            settings_dirty: false,
            user_data_dirty: false,
            last_edit_at: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the current article markdown.
    pub fn content(&self) -> &str {
        &self.user_data.content
    }

    /// Record an edit made by the editor widget.
    ///
    /// `now` is the current app time in seconds, used for auto-save timing.
    pub fn mark_content_edited(&mut self, now: f64) {
        self.user_data_dirty = true;
        self.last_edit_at = Some(now);
    }

    /// Replace the article content (AI layout, draft restore).
    pub fn set_content(&mut self, content: String, now: f64) {
        if content != self.user_data.content {
            self.user_data.content = content;
            self.mark_content_edited(now);
        }
    }

    /// Append text to the article on a new line.
    pub fn append_content(&mut self, text: &str, now: f64) {
        self.user_data.content.push('\n');
        self.user_data.content.push_str(text);
        self.mark_content_edited(now);
    }

    /// Append generated-image markdown to the article.
    pub fn append_image(&mut self, url: &str, now: f64) {
        let image_markdown = format!("\n![AI生成图片]({})\n", url);
        self.user_data.content.push_str(&image_markdown);
        self.mark_content_edited(now);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Drafts
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the current content as a draft.
    pub fn save_draft(&mut self, now_ms: u64) {
        let content = self.user_data.content.clone();
        self.user_data.save_draft(&content, now_ms);
        self.user_data_dirty = true;
        debug!("Saved draft ({} total)", self.user_data.drafts.len());
    }

    /// Restore a draft into the editor. Returns `false` for an unknown id.
    pub fn restore_draft(&mut self, id: &str, now: f64) -> bool {
        let Some(content) = self.user_data.draft(id).map(|d| d.content.clone()) else {
            return false;
        };
        self.set_content(content, now);
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Skins
    // ─────────────────────────────────────────────────────────────────────────

    /// CSS of the active skin.
    pub fn active_skin_css(&self) -> &str {
        &self.skins.active(&self.settings.preview.skin_id).css
    }

    /// Name of the active skin, for the status bar.
    pub fn active_skin_name(&self) -> &str {
        &self.skins.active(&self.settings.preview.skin_id).name
    }

    /// Select a skin and mark settings dirty.
    pub fn select_skin(&mut self, id: &str) {
        self.settings.preview.skin_id = String::from(id);
        self.settings_dirty = true;
    }

    /// Write skin library changes back into user data for persistence.
    ///
    /// Call after any mutation through `self.skins`.
    pub fn sync_skins(&mut self) {
        self.user_data.custom_skins = self.skins.custom_skins();
        self.user_data.favorite_skins = self.skins.favorite_builtin_ids();
        self.user_data_dirty = true;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings & Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings_dirty = true;
    }

    /// Mark settings as dirty (needing to be saved).
    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Mark user data as dirty (needing to be saved).
    pub fn mark_user_data_dirty(&mut self) {
        self.user_data_dirty = true;
    }

    /// Save settings to the config file if modified. Returns `true` on save.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty && save_config_silent(&self.settings) {
            self.settings_dirty = false;
            debug!("Settings saved");
            return true;
        }
        false
    }

    /// Save user data to disk if modified. Returns `true` on save.
    pub fn save_user_data_if_dirty(&mut self) -> bool {
        if self.user_data_dirty && save_user_data_silent(&self.user_data) {
            self.user_data_dirty = false;
            self.last_edit_at = None;
            debug!("User data saved");
            return true;
        }
        false
    }

    /// Auto-save user data once the configured quiet period has elapsed
    /// since the last edit. Returns `true` if a save happened.
    pub fn maybe_auto_save(&mut self, now: f64) -> bool {
        if !self.settings.editor.auto_save {
            return false;
        }
        let Some(last_edit) = self.last_edit_at else {
            return false;
        };
        if now - last_edit >= f64::from(self.settings.editor.auto_save_interval_secs) {
            return self.save_user_data_if_dirty();
        }
        false
    }

    /// Whether unsaved edits exist.
    pub fn has_unsaved_changes(&self) -> bool {
        self.user_data_dirty
    }

    /// Persist everything on shutdown.
    pub fn shutdown(&mut self) {
        self.settings_dirty = true;
        self.user_data_dirty = true;
        self.save_settings_if_dirty();
        self.save_user_data_if_dirty();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Confirmation Flow
    // ─────────────────────────────────────────────────────────────────────────

    /// Open the confirmation dialog for an action.
    pub fn request_confirm(&mut self, message: impl Into<String>, action: PendingAction) {
        self.ui.show_confirm_dialog = true;
        self.ui.confirm_dialog_message = message.into();
        self.ui.pending_action = Some(action);
    }

    /// Execute the confirmed pending action.
    pub fn handle_confirmed_action(&mut self) {
        if let Some(action) = self.ui.pending_action.take() {
            match action {
                PendingAction::ClearChatHistory => {
                    self.user_data.chat_history.clear();
                    self.user_data_dirty = true;
                }
                PendingAction::DeleteSnippet(id) => {
                    self.user_data.snippets.remove(&id);
                    self.user_data_dirty = true;
                }
                PendingAction::DeleteSkin(id) => {
                    if self.skins.remove(&id) {
                        self.sync_skins();
                    }
                }
                PendingAction::DeleteDraft(id) => {
                    self.user_data.delete_draft(&id);
                    self.user_data_dirty = true;
                }
                PendingAction::ResetSettings => {
                    self.settings = Settings::default();
                    self.settings_dirty = true;
                }
            }
        }
        self.ui.show_confirm_dialog = false;
        self.ui.confirm_dialog_message.clear();
    }

    /// Cancel the pending action.
    pub fn cancel_pending_action(&mut self) {
        self.ui.pending_action = None;
        self.ui.show_confirm_dialog = false;
        self.ui.confirm_dialog_message.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a modal dialog (closing any other).
    pub fn open_modal(&mut self, modal: Modal) {
        self.ui.active_modal = modal;
    }

    /// Close the active modal.
    pub fn close_modal(&mut self) {
        self.ui.active_modal = Modal::None;
    }

    /// Show a temporary toast message.
    ///
    /// `now` is the current app time in seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, now: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(now + TOAST_DURATION_SECS);
    }

    /// Update toast state - clears expired toasts.
    ///
    /// Call this each frame with the current time.
    pub fn update_toast(&mut self, now: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if now >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }

    /// Show a blocking alert the user must acknowledge.
    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.ui.alert_message = Some(message.into());
    }

    /// Dismiss the blocking alert.
    pub fn dismiss_alert(&mut self) {
        self.ui.alert_message = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatRole;

    fn test_state() -> AppState {
        AppState::with_data(Settings::default(), UserData::default())
    }

    #[test]
    fn test_new_state_defaults() {
        let state = test_state();
        assert!(state.content().starts_with("# 欢迎使用公众号编辑器"));
        assert_eq!(state.ui.active_modal, Modal::None);
        assert!(!state.has_unsaved_changes());
        assert_eq!(state.active_skin_name(), "简约像素风");
    }

    #[test]
    fn test_set_content_marks_dirty() {
        let mut state = test_state();
        state.set_content(String::from("# 新文章"), 1.0);
        assert!(state.has_unsaved_changes());
        assert_eq!(state.content(), "# 新文章");

        // Setting identical content is not an edit
        let mut state = test_state();
        state.set_content(state.content().to_string(), 1.0);
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn test_append_content_and_image() {
        let mut state = test_state();
        state.set_content(String::from("正文"), 0.0);
        state.append_content("结尾片段", 1.0);
        assert_eq!(state.content(), "正文\n结尾片段");

        state.append_image("https://example.com/a.png", 2.0);
        assert!(state
            .content()
            .ends_with("\n![AI生成图片](https://example.com/a.png)\n"));
    }

    #[test]
    fn test_draft_roundtrip() {
        let mut state = test_state();
        state.set_content(String::from("# 旧版本"), 0.0);
        state.save_draft(1_000);
        state.set_content(String::from("# 新版本"), 1.0);

        assert!(state.restore_draft("1000", 2.0));
        assert_eq!(state.content(), "# 旧版本");
        assert!(!state.restore_draft("missing", 3.0));
    }

    #[test]
    fn test_select_skin_updates_settings() {
        let mut state = test_state();
        state.select_skin("dark");
        assert_eq!(state.settings.preview.skin_id, "dark");
        assert_eq!(state.active_skin_name(), "深色护眼");
        assert!(state.settings_dirty);
    }

    #[test]
    fn test_unknown_skin_falls_back() {
        let mut state = test_state();
        state.settings.preview.skin_id = String::from("missing");
        assert_eq!(state.active_skin_name(), "简约像素风");
    }

    #[test]
    fn test_sync_skins_writes_back() {
        let mut state = test_state();
        state
            .skins
            .add(crate::skin::Skin::custom("我的主题", "#preview-root {}", 7));
        state.skins.toggle_favorite("dark");
        state.sync_skins();

        assert_eq!(state.user_data.custom_skins.len(), 1);
        assert_eq!(state.user_data.favorite_skins, vec![String::from("dark")]);
        assert!(state.user_data_dirty);
    }

    #[test]
    fn test_toast_expiry() {
        let mut state = test_state();
        state.show_toast("公众号格式复制成功！可直接粘贴到后台", 10.0);
        assert!(state.ui.toast_message.is_some());

        state.update_toast(10.0 + TOAST_DURATION_SECS - 0.1);
        assert!(state.ui.toast_message.is_some());

        state.update_toast(10.0 + TOAST_DURATION_SECS);
        assert!(state.ui.toast_message.is_none());
    }

    #[test]
    fn test_confirm_clear_chat_history() {
        let mut state = test_state();
        state.user_data.push_chat(ChatRole::User, "你好", 1);
        state.request_confirm("确定清空对话历史吗？", PendingAction::ClearChatHistory);
        assert!(state.ui.show_confirm_dialog);

        state.handle_confirmed_action();
        assert!(state.user_data.chat_history.is_empty());
        assert!(!state.ui.show_confirm_dialog);
    }

    #[test]
    fn test_confirm_delete_snippet() {
        let mut state = test_state();
        let id = state.user_data.snippets.all()[0].id.clone();
        state.request_confirm(
            "确定要删除这个片段吗？",
            PendingAction::DeleteSnippet(id.clone()),
        );
        state.handle_confirmed_action();
        assert!(state.user_data.snippets.get(&id).is_none());
    }

    #[test]
    fn test_cancel_pending_action() {
        let mut state = test_state();
        state.request_confirm("确定清空对话历史吗？", PendingAction::ClearChatHistory);
        state.cancel_pending_action();
        assert!(state.ui.pending_action.is_none());
        assert!(!state.ui.show_confirm_dialog);
    }

    #[test]
    fn test_confirm_reset_settings() {
        let mut state = test_state();
        state.settings.editor.font_size = 18.0;
        state.request_confirm(
            "确定要恢复默认设置吗？所有自定义配置将丢失。",
            PendingAction::ResetSettings,
        );
        state.handle_confirmed_action();
        assert_eq!(state.settings, Settings::default());
    }

    #[test]
    fn test_auto_save_respects_interval() {
        let mut state = test_state();
        state.settings.editor.auto_save = true;
        state.settings.editor.auto_save_interval_secs = 5;
        state.set_content(String::from("编辑"), 100.0);

        // Too early - nothing to do (the positive path would hit the real
        // filesystem, so only the negative paths are asserted here)
        assert!(!state.maybe_auto_save(104.0));

        state.settings.editor.auto_save = false;
        assert!(!state.maybe_auto_save(200.0));
    }

    #[test]
    fn test_modal_switching() {
        let mut state = test_state();
        state.open_modal(Modal::Skins);
        assert_eq!(state.ui.active_modal, Modal::Skins);
        state.open_modal(Modal::Ai);
        assert_eq!(state.ui.active_modal, Modal::Ai);
        state.close_modal();
        assert_eq!(state.ui.active_modal, Modal::None);
    }
}
