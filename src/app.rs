//! Main application module for PixelMark
//!
//! This module implements the eframe App trait for the editor, wiring the
//! custom title bar, the toolbar, the editor/preview split, the modal layer
//! and background AI results into [`AppState`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use eframe::egui;
use log::{debug, info, warn};

use crate::ai::{AiEvent, AiTask, AiWorker, ChatRole, ImageSize};
use crate::config::{unix_millis, DeviceWidth, Settings};
use crate::editor::{
    apply_command, check_syntax, count_words, EditorPane, FormatCommand, SyntaxIssue, WordCount,
};
use crate::export::{ClipboardExporter, CopyOutcome, SystemClipboard};
use crate::files::{dialogs, transfer};
use crate::fonts::setup_fonts;
use crate::preview::{PaneMetrics, PreviewDocument, ScrollSyncController, SyncPane};
use crate::skin::{Skin, SkinLibrary};
use crate::state::{AppState, Modal, PendingAction};
use crate::theme::{ThemeColors, ThemeManager};
use crate::ui::{
    self, show_alert_dialog, show_confirm_dialog, show_toast, AiModal, ConfirmChoice,
    SettingsModal, SkinsModal, SnippetsModal, ToolbarAction, WindowResizeState, TOOLBAR_HEIGHT,
};

const STATUS_BAR_HEIGHT: f32 = 26.0;
const PREVIEW_HEADER_HEIGHT: f32 = 32.0;

/// Minimum article length (in characters) before auto layout is offered.
const MIN_LAYOUT_CHARS: usize = 10;

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone, Copy)]
enum KeyboardAction {
    /// Copy the article to the clipboard in WeChat format (Ctrl+Shift+C)
    CopyToWechat,
    /// Save the current content as a draft (Ctrl+S)
    SaveDraft,
    /// Apply a markdown formatting command to the selection (Ctrl+B, Ctrl+I)
    Format(FormatCommand),
}

/// The main application struct that holds all state and implements eframe::App.
pub struct PixelMarkApp {
    /// Central application state
    state: AppState,
    /// Theme manager for handling theme switching
    theme_manager: ThemeManager,
    /// Clipboard serializer for the one-click WeChat copy
    exporter: ClipboardExporter,
    /// Background worker running AI requests off the UI thread
    ai_worker: AiWorker,
    /// Number of submitted AI tasks that have not produced an event yet
    ai_pending: usize,

    /// Rendered preview of the current content against the active skin
    preview: PreviewDocument,
    /// Hash of (content, skin css) the preview was built from
    preview_stamp: u64,
    /// Syntax issues for the current content, shown as editor chips
    syntax_issues: Vec<SyntaxIssue>,
    /// Word count for the current content
    word_count: WordCount,

    /// Settings modal, present while open
    settings_modal: Option<SettingsModal>,
    /// Skin library modal, present while open
    skins_modal: Option<SkinsModal>,
    /// Snippet library modal, present while open
    snippets_modal: Option<SnippetsModal>,
    /// AI assistant modal, present while open
    ai_modal: Option<AiModal>,
    /// Editor byte selection captured when the AI modal opened, so that
    /// "replace selection" still works after the editor lost focus
    ai_selection: Option<(usize, usize)>,

    /// Live editor byte selection from the last rendered frame
    editor_selection: Option<(usize, usize)>,

    /// Live caret byte offset, kept even when the selection is collapsed so
    /// format shortcuts can insert an empty marker pair at the caret
    editor_caret: Option<usize>,
    /// Scroll synchronization between the editor and preview panes
    sync: ScrollSyncController,
    /// Scroll offset to force on the editor pane next frame
    editor_forced_offset: Option<f32>,
    /// Scroll offset to force on the preview pane next frame
    preview_forced_offset: Option<f32>,

    /// Set when the close button was clicked
    should_exit: bool,
    /// Last observed window size, to avoid rewriting settings every frame
    last_window_size: Option<egui::Vec2>,
    /// Last observed window position
    last_window_pos: Option<egui::Pos2>,
    /// Edge-resize tracking for the undecorated window
    window_resize_state: WindowResizeState,
    /// Application start time, the basis for toast and auto-save clocks
    start_time: Instant,
}

impl PixelMarkApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        setup_fonts(&cc.egui_ctx);

        let state = AppState::new();
        let mut theme_manager = ThemeManager::new(state.settings.general.theme);
        theme_manager.apply(&cc.egui_ctx);

        let content = state.content().to_string();
        let skin_css = state.active_skin_css().to_string();
        let preview = PreviewDocument::build(&content, &skin_css);
        let word_count = count_words(&content);
        let syntax_issues = check_syntax(&content);

        let mut sync = ScrollSyncController::default();
        sync.set_enabled(state.settings.preview.sync_scroll);

        info!(
            "editor ready: {} draft(s), {} custom skin(s)",
            state.user_data.drafts.len(),
            state.skins.custom_count()
        );

        Self {
            preview_stamp: content_stamp(&content, &skin_css),
            state,
            theme_manager,
            exporter: ClipboardExporter::new(),
            ai_worker: AiWorker::new(),
            ai_pending: 0,
            preview,
            syntax_issues,
            word_count,
            settings_modal: None,
            skins_modal: None,
            snippets_modal: None,
            ai_modal: None,
            ai_selection: None,
            editor_selection: None,
            editor_caret: None,
            sync,
            editor_forced_offset: None,
            preview_forced_offset: None,
            should_exit: false,
            last_window_size: None,
            last_window_pos: None,
            window_resize_state: WindowResizeState::new(),
            start_time: Instant::now(),
        }
    }

    fn app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Rebuild the preview document when the content or the active skin
    /// changed since the last frame.
    fn refresh_preview(&mut self) {
        let stamp = content_stamp(self.state.content(), self.state.active_skin_css());
        if stamp == self.preview_stamp {
            return;
        }
        self.preview_stamp = stamp;
        let css = self.state.active_skin_css().to_string();
        self.preview = PreviewDocument::build(self.state.content(), &css);
        self.word_count = count_words(self.state.content());
        self.syntax_issues = check_syntax(self.state.content());
    }

    // ───── Window chrome ─────

    /// Track window geometry so the next launch restores it. Written straight
    /// into settings without dirty-marking; persisted on shutdown.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let (size, pos, maximized) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                viewport.inner_rect.map(|r| r.size()),
                viewport.outer_rect.map(|r| r.min),
                viewport.maximized.unwrap_or(false),
            )
        });

        self.state.settings.general.window_size.maximized = maximized;
        if maximized {
            return;
        }

        if let Some(size) = size {
            let changed = self
                .last_window_size
                .map_or(true, |prev| (prev - size).length() > 1.0);
            if changed {
                self.last_window_size = Some(size);
                self.state.settings.general.window_size.width = size.x;
                self.state.settings.general.window_size.height = size.y;
            }
        }
        if let Some(pos) = pos {
            let changed = self
                .last_window_pos
                .map_or(true, |prev| (prev - pos).length() > 1.0);
            if changed {
                self.last_window_pos = Some(pos);
                self.state.settings.general.window_size.x = Some(pos.x);
                self.state.settings.general.window_size.y = Some(pos.y);
            }
        }
    }

    fn show_title_bar(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        let is_maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        let close_hover_color = egui::Color32::from_rgb(232, 17, 35);
        let text_color = colors.text.secondary;

        egui::TopBottomPanel::top("title_bar")
            .frame(
                egui::Frame::none()
                    .fill(colors.base.background_secondary)
                    .stroke(egui::Stroke::NONE)
                    .inner_margin(egui::Margin::ZERO),
            )
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.spacing_mut().item_spacing.y = 0.0;
                ui.add_space(3.0);

                ui.horizontal(|ui| {
                    ui.add_space(12.0);
                    ui.label(egui::RichText::new("▩").size(14.0).color(colors.ui.accent));
                    ui.add_space(6.0);
                    ui.label(
                        egui::RichText::new("PixelMark")
                            .size(12.0)
                            .color(text_color),
                    );

                    // Fill remaining space with draggable area
                    let drag_rect = ui.available_rect_before_wrap();
                    let drag_response = ui.allocate_rect(drag_rect, egui::Sense::click_and_drag());

                    if drag_response.double_clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Maximized(!is_maximized));
                    }

                    // Drag to move, but not while an edge resize is active
                    let is_in_resize = self.window_resize_state.current_direction().is_some()
                        || self.window_resize_state.is_resizing();
                    if drag_response.dragged() && !is_in_resize {
                        ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(4.0);

                        // Close button (×)
                        let close_btn = ui.add(
                            egui::Button::new(
                                egui::RichText::new("×").size(16.0).color(text_color),
                            )
                            .frame(false)
                            .min_size(egui::vec2(46.0, 28.0)),
                        );
                        if close_btn.hovered() {
                            ui.painter()
                                .rect_filled(close_btn.rect, 0.0, close_hover_color);
                            ui.painter().text(
                                close_btn.rect.center(),
                                egui::Align2::CENTER_CENTER,
                                "×",
                                egui::FontId::proportional(16.0),
                                egui::Color32::WHITE,
                            );
                        }
                        if close_btn.clicked() {
                            self.should_exit = true;
                        }

                        // Maximize/Restore button
                        let max_icon = if is_maximized { "❐" } else { "□" };
                        let max_btn = ui.add(
                            egui::Button::new(
                                egui::RichText::new(max_icon).size(14.0).color(text_color),
                            )
                            .frame(false)
                            .min_size(egui::vec2(46.0, 28.0)),
                        );
                        if max_btn.hovered() {
                            ui.painter()
                                .rect_filled(max_btn.rect, 0.0, colors.base.hover);
                        }
                        if max_btn.clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Maximized(!is_maximized));
                        }

                        // Minimize button - draw a line
                        let min_btn = ui.add(
                            egui::Button::new(egui::RichText::new(" ").size(14.0))
                                .frame(false)
                                .min_size(egui::vec2(46.0, 28.0)),
                        );
                        if min_btn.hovered() {
                            ui.painter()
                                .rect_filled(min_btn.rect, 0.0, colors.base.hover);
                        }
                        let center = min_btn.rect.center();
                        ui.painter().line_segment(
                            [
                                egui::pos2(center.x - 5.0, center.y),
                                egui::pos2(center.x + 5.0, center.y),
                            ],
                            egui::Stroke::new(1.5, text_color),
                        );
                        if min_btn.clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
                        }
                    });
                });

                ui.add_space(3.0);
            });
    }

    // ───── Main layout ─────

    fn render_ui(&mut self, ctx: &egui::Context, now: f64) {
        let colors = self.theme_manager.colors(ctx);

        self.show_title_bar(ctx, &colors);
        self.show_toolbar(ctx, now, &colors);
        if self.state.settings.general.show_status_bar {
            self.show_status_bar(ctx, &colors);
        }

        let editor_metrics = self.show_editor_pane(ctx, now, &colors);
        let preview_metrics = self.show_preview_pane(ctx, &colors);
        self.sync_panes(editor_metrics, preview_metrics);

        self.show_active_modal(ctx, now, &colors);
        self.show_dialog_layer(ctx, &colors);
    }

    fn show_toolbar(&mut self, ctx: &egui::Context, now: f64, colors: &ThemeColors) {
        let action = egui::TopBottomPanel::top("toolbar")
            .exact_height(TOOLBAR_HEIGHT)
            .frame(egui::Frame::none())
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui::toolbar::show(ui, &self.word_count, self.exporter.is_in_flight(), colors)
            })
            .inner;

        match action {
            Some(ToolbarAction::OpenSnippets) => self.open_modal(Modal::Snippets),
            Some(ToolbarAction::OpenAi) => self.open_modal(Modal::Ai),
            Some(ToolbarAction::OpenSkins) => self.open_modal(Modal::Skins),
            Some(ToolbarAction::OpenSettings) => self.open_modal(Modal::Settings),
            Some(ToolbarAction::CopyToWechat) => self.copy_to_wechat(now),
            None => {}
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        let has_unsaved = self.state.has_unsaved_changes();
        let skin_name = self.state.active_skin_name().to_string();
        let word_count = self.word_count;

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::none()
                    .fill(colors.base.background_secondary)
                    .inner_margin(egui::Margin::symmetric(12.0, 4.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let (dot_color, save_label) = if has_unsaved {
                        (colors.ui.warning, "未保存")
                    } else {
                        (colors.ui.success, "已自动保存")
                    };
                    ui.label(egui::RichText::new("●").size(8.0).color(dot_color));
                    ui.label(
                        egui::RichText::new(save_label)
                            .size(11.0)
                            .color(colors.text.muted),
                    );
                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new(word_count.format_status())
                            .size(11.0)
                            .color(colors.text.secondary),
                    );
                    if word_count.within_recommended() {
                        ui.add_space(8.0);
                        ui.label(
                            egui::RichText::new("✓ 符合公众号建议字数")
                                .size(11.0)
                                .color(colors.ui.success),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new("Ctrl+B 加粗 | Ctrl+I 斜体 | Ctrl+Shift+C 复制")
                                .size(10.0)
                                .color(colors.text.disabled),
                        );
                        ui.add_space(16.0);
                        ui.label(
                            egui::RichText::new("Markdown 语法支持中")
                                .size(11.0)
                                .color(colors.text.muted),
                        );
                        ui.add_space(16.0);
                        ui.label(
                            egui::RichText::new(format!("主题: {skin_name}"))
                                .size(11.0)
                                .color(colors.text.muted),
                        );
                    });
                });
            });
    }

    fn show_editor_pane(
        &mut self,
        ctx: &egui::Context,
        now: f64,
        colors: &ThemeColors,
    ) -> PaneMetrics {
        let screen_width = ctx.screen_rect().width();
        let ratio = clamp_split_ratio(self.state.settings.general.split_ratio);
        let forced_offset = self.editor_forced_offset.take();

        let font_size = self.state.settings.editor.font_size;
        let tab_size = self.state.settings.editor.tab_size;
        let show_line_numbers = self.state.settings.editor.show_line_numbers;
        let paste_plain = self.state.settings.editor.paste_plain_text;

        let panel = egui::SidePanel::left("editor_pane")
            .resizable(true)
            .default_width(screen_width * ratio)
            .width_range(
                screen_width * Settings::MIN_SPLIT_RATIO
                    ..=screen_width * Settings::MAX_SPLIT_RATIO,
            )
            .frame(egui::Frame::none().fill(colors.base.background))
            .show(ctx, |ui| {
                EditorPane::new(&mut self.state.user_data.content)
                    .font_size(font_size)
                    .tab_size(tab_size)
                    .show_line_numbers(show_line_numbers)
                    .paste_plain_text(paste_plain)
                    .issues(&self.syntax_issues)
                    .snippets(self.state.user_data.snippets.context_menu_entries())
                    .sync_scroll_offset(forced_offset)
                    .show(ui, colors)
            });

        let output = panel.inner;
        if output.changed {
            self.state.mark_content_edited(now);
        }
        self.editor_selection = output.selection;
        self.editor_caret = output.caret;
        if output.open_snippet_library {
            self.open_modal(Modal::Snippets);
        }

        // Remember the divider position across sessions.
        let new_ratio = clamp_split_ratio(panel.response.rect.width() / screen_width.max(1.0));
        if (new_ratio - ratio).abs() > 0.005 {
            self.state.settings.general.split_ratio = new_ratio;
        }

        PaneMetrics::new(
            output.scroll_offset,
            output.content_height,
            output.viewport_height,
        )
    }

    fn show_preview_pane(&mut self, ctx: &egui::Context, colors: &ThemeColors) -> PaneMetrics {
        let forced_offset = self.preview_forced_offset.take();
        let device = self.state.settings.preview.device_width;
        let mut device_clicked: Option<DeviceWidth> = None;
        let mut metrics = PaneMetrics::new(0.0, 0.0, 0.0);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(colors.base.background_tertiary))
            .show(ctx, |ui| {
                ui.allocate_ui_with_layout(
                    egui::vec2(ui.available_width(), PREVIEW_HEADER_HEIGHT),
                    egui::Layout::left_to_right(egui::Align::Center),
                    |ui| {
                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new("模拟设备")
                                .size(11.0)
                                .color(colors.text.muted),
                        );
                        ui.add_space(4.0);
                        for candidate in DeviceWidth::all() {
                            let selected = *candidate == device;
                            let text = egui::RichText::new(candidate.icon()).size(13.0).color(
                                if selected {
                                    colors.ui.accent
                                } else {
                                    colors.text.muted
                                },
                            );
                            let button = egui::Button::new(text)
                                .fill(if selected {
                                    colors.base.selected
                                } else {
                                    egui::Color32::TRANSPARENT
                                })
                                .stroke(egui::Stroke::NONE)
                                .min_size(egui::vec2(28.0, 22.0));
                            if ui.add(button).on_hover_text(candidate.label()).clicked() {
                                device_clicked = Some(*candidate);
                            }
                        }
                    },
                );
                ui.separator();

                let mut scroll = egui::ScrollArea::vertical()
                    .id_source("preview_scroll")
                    .auto_shrink([false, false]);
                if let Some(offset) = forced_offset {
                    scroll = scroll.vertical_scroll_offset(offset.max(0.0));
                }
                let scroll_output = scroll.show(ui, |ui| {
                    let page_width = device
                        .width()
                        .map_or(ui.available_width(), |w| w.min(ui.available_width()));
                    let margin = ((ui.available_width() - page_width) / 2.0).max(0.0);
                    ui.horizontal_top(|ui| {
                        ui.add_space(margin);
                        ui.vertical(|ui| {
                            ui.set_width(page_width);
                            self.preview.renderer().show(ui);
                        });
                    });
                });

                metrics = PaneMetrics::new(
                    scroll_output.state.offset.y,
                    scroll_output.content_size.y,
                    scroll_output.inner_rect.height(),
                );
            });

        if let Some(device) = device_clicked {
            self.state
                .update_settings(|s| s.preview.device_width = device);
            debug!("preview device width set to {:?}", device);
        }
        metrics
    }

    /// Mirror scrolling between the panes, editor first so a simultaneous
    /// drag on both sides resolves in the editor's favor.
    fn sync_panes(&mut self, editor: PaneMetrics, preview: PaneMetrics) {
        self.sync
            .set_enabled(self.state.settings.preview.sync_scroll);

        if self.sync.is_significant_delta(SyncPane::Editor, editor.offset) {
            if let Some(target) = self.sync.on_scroll(SyncPane::Editor, editor, preview) {
                self.preview_forced_offset = Some(target);
            }
        } else if self.sync.is_significant_delta(SyncPane::Preview, preview.offset) {
            if let Some(target) = self.sync.on_scroll(SyncPane::Preview, preview, editor) {
                self.editor_forced_offset = Some(target);
            }
        }

        self.sync.update_offset(SyncPane::Editor, editor.offset);
        self.sync.update_offset(SyncPane::Preview, preview.offset);
    }

    // ───── Modals ─────

    fn open_modal(&mut self, modal: Modal) {
        match modal {
            Modal::Settings => {
                self.settings_modal = Some(SettingsModal::new(&self.state.settings));
            }
            Modal::Skins => self.skins_modal = Some(SkinsModal::new()),
            Modal::Snippets => self.snippets_modal = Some(SnippetsModal::new()),
            Modal::Ai => {
                self.ai_selection = self.editor_selection;
                let selection = self.current_selection_text();
                let last_image = self
                    .state
                    .user_data
                    .image_history
                    .first()
                    .map(|image| image.url.clone());
                self.ai_modal = Some(AiModal::new(&selection, last_image.as_deref()));
            }
            Modal::None => {}
        }
        self.state.open_modal(modal);
    }

    fn close_active_modal(&mut self) {
        self.settings_modal = None;
        self.skins_modal = None;
        self.snippets_modal = None;
        self.ai_modal = None;
        self.ai_selection = None;
        self.state.close_modal();
    }

    /// Text currently selected in the editor, or empty when nothing is.
    fn current_selection_text(&self) -> String {
        self.editor_selection
            .and_then(|(start, end)| self.state.content().get(start..end))
            .unwrap_or_default()
            .to_string()
    }

    fn show_active_modal(&mut self, ctx: &egui::Context, now: f64, colors: &ThemeColors) {
        match self.state.ui.active_modal {
            Modal::Settings => self.show_settings_modal(ctx, now, colors),
            Modal::Skins => self.show_skins_modal(ctx, colors),
            Modal::Snippets => self.show_snippets_modal(ctx, now, colors),
            Modal::Ai => self.show_ai_modal(ctx, now, colors),
            Modal::None => {}
        }
    }

    fn show_settings_modal(&mut self, ctx: &egui::Context, now: f64, colors: &ThemeColors) {
        let output = {
            let Some(modal) = self.settings_modal.as_mut() else {
                return;
            };
            modal.show(ctx, &self.state.user_data.drafts, unix_millis(), colors)
        };

        if let Some(settings) = output.saved {
            let theme = settings.general.theme;
            self.state.update_settings(|s| *s = settings);
            self.theme_manager.set_theme(theme);
            self.state.save_settings_if_dirty();
            info!("settings saved");
        }
        if output.reset_requested {
            self.state.request_confirm(
                "确定要恢复默认设置吗？所有自定义配置将丢失。",
                PendingAction::ResetSettings,
            );
        }

        if output.export_config {
            self.export_settings_to_file();
        }
        if output.import_config {
            self.import_settings_from_file(now);
        }
        if output.export_user_data {
            self.export_user_data_to_file();
        }
        if output.import_user_data {
            self.import_user_data_from_file(now);
        }

        if let Some(id) = output.restore_draft {
            if self.state.restore_draft(&id, now) {
                info!("draft {id} restored");
                self.close_active_modal();
            }
        }
        if let Some(id) = output.delete_draft {
            self.state
                .request_confirm("确定要删除这个草稿吗？", PendingAction::DeleteDraft(id));
        }

        if output.close_requested {
            self.close_active_modal();
        }
    }

    fn export_settings_to_file(&mut self) {
        let Some(path) = dialogs::save_json_dialog("导出配置", dialogs::CONFIG_EXPORT_NAME) else {
            return;
        };
        match transfer::export_settings(&path, &self.state.settings) {
            Ok(()) => info!("settings exported to {}", path.display()),
            Err(err) => {
                warn!("settings export failed: {err}");
                self.state.show_alert(format!("导出失败: {err}"));
            }
        }
    }

    fn import_settings_from_file(&mut self, now: f64) {
        let Some(path) = dialogs::open_json_dialog("导入配置") else {
            return;
        };
        match transfer::import_settings(&path) {
            Ok(settings) => {
                let theme = settings.general.theme;
                self.state.update_settings(|s| *s = settings);
                self.theme_manager.set_theme(theme);
                self.state.save_settings_if_dirty();
                // Re-seed the open modal so its widgets show the imported values.
                self.settings_modal = Some(SettingsModal::new(&self.state.settings));
                self.state.show_toast("配置导入成功", now);
            }
            Err(err) => {
                warn!("settings import failed: {err}");
                self.state.show_alert("配置文件格式错误");
            }
        }
    }

    fn export_user_data_to_file(&mut self) {
        let Some(path) = dialogs::save_json_dialog("导出用户数据", dialogs::USER_DATA_EXPORT_NAME)
        else {
            return;
        };
        match transfer::export_user_data(&path, &self.state.user_data) {
            Ok(()) => info!("user data exported to {}", path.display()),
            Err(err) => {
                warn!("user data export failed: {err}");
                self.state.show_alert(format!("导出失败: {err}"));
            }
        }
    }

    fn import_user_data_from_file(&mut self, now: f64) {
        let Some(path) = dialogs::open_json_dialog("导入用户数据") else {
            return;
        };
        match transfer::import_user_data(&path) {
            Ok(data) => {
                self.state.skins =
                    SkinLibrary::with_custom(data.custom_skins.clone(), &data.favorite_skins);
                self.state.user_data = data;
                self.state.mark_user_data_dirty();
                self.state.save_user_data_if_dirty();
                self.state.show_toast("用户数据恢复成功", now);
            }
            Err(err) => {
                warn!("user data import failed: {err}");
                self.state.show_alert("数据文件格式错误");
            }
        }
    }

    fn show_skins_modal(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        let output = {
            let Some(modal) = self.skins_modal.as_mut() else {
                return;
            };
            let active_id = self.state.settings.preview.skin_id.clone();
            modal.show(ctx, &self.state.skins, &active_id, colors)
        };

        if let Some(id) = output.apply {
            self.state.select_skin(&id);
        }
        if let Some(id) = output.toggle_favorite {
            self.state.skins.toggle_favorite(&id);
            self.state.sync_skins();
        }
        if let Some(id) = output.delete {
            self.state
                .request_confirm("确定要删除这个主题吗？", PendingAction::DeleteSkin(id));
        }
        if let Some((id, name)) = output.rename {
            if self.state.skins.rename(&id, &name) {
                self.state.sync_skins();
            }
        }
        if let Some((id, css)) = output.set_css {
            if self.state.skins.set_css(&id, &css) {
                self.state.sync_skins();
            }
        }
        if let Some(description) = output.generate {
            self.request_skin_generation(description);
        }
        if output.copied_css {
            debug!("skin css copied to clipboard");
        }
        if output.close_requested {
            self.close_active_modal();
        }
    }

    fn request_skin_generation(&mut self, description: String) {
        let profile = self.state.settings.ai.chat.clone();
        if !profile.has_key() {
            if let Some(modal) = self.skins_modal.as_mut() {
                modal.generation_finished(Err("请先在\"设置\"中配置 AI API Key".to_string()));
            }
            return;
        }
        info!("requesting skin generation");
        self.ai_worker.submit(AiTask::GenerateSkinCss {
            profile,
            description,
        });
        self.ai_pending += 1;
    }

    fn show_snippets_modal(&mut self, ctx: &egui::Context, now: f64, colors: &ThemeColors) {
        let output = {
            let Some(modal) = self.snippets_modal.as_mut() else {
                return;
            };
            modal.show(ctx, &self.state.user_data.snippets, colors)
        };

        if let Some(content) = output.insert {
            self.state.append_content(&content, now);
            self.close_active_modal();
        }
        if let Some((title, category, content)) = output.add {
            self.state
                .user_data
                .snippets
                .add(&title, &category, &content, unix_millis());
            self.state.mark_user_data_dirty();
        }
        if let Some((id, title, category, content)) = output.update {
            if self
                .state
                .user_data
                .snippets
                .update(&id, &title, &category, &content)
            {
                self.state.mark_user_data_dirty();
            }
        }
        if let Some(id) = output.delete {
            self.state
                .request_confirm("确定要删除这个片段吗？", PendingAction::DeleteSnippet(id));
        }
        if output.close_requested {
            self.close_active_modal();
        }
    }

    fn show_ai_modal(&mut self, ctx: &egui::Context, now: f64, colors: &ThemeColors) {
        let selection = self.current_selection_text();
        let output = {
            let Some(modal) = self.ai_modal.as_mut() else {
                return;
            };
            modal.show(
                ctx,
                &self.state.user_data.chat_history,
                &selection,
                &self.state.user_data.content,
                colors,
            )
        };

        if let Some(prompt) = output.send_chat {
            self.send_chat_message(prompt);
        }
        if output.clear_history {
            self.state
                .request_confirm("确定清空对话历史吗？", PendingAction::ClearChatHistory);
        }
        if output.copied_reply {
            debug!("chat reply copied to clipboard");
        }
        if let Some(text) = output.insert_text {
            self.state.append_content(&text, now);
        }
        if let Some(text) = output.replace_selection {
            self.replace_ai_selection(&text, now);
        }

        if output.start_layout {
            self.request_auto_layout();
        }
        if let Some(markdown) = output.apply_layout {
            self.state.set_content(markdown, now);
        }

        if let Some((prompt, size)) = output.generate_image {
            self.request_image(prompt, size);
        }
        if let Some(url) = output.insert_image {
            self.state.append_image(&url, now);
        }
        if let Some(url) = output.open_image {
            if let Err(err) = transfer::open_image_url(&url) {
                warn!("failed to open generated image: {err}");
            }
        }
        if let Some(message) = output.alert {
            self.state.show_alert(message);
        }
        if output.close_requested {
            self.close_active_modal();
        }
    }

    fn send_chat_message(&mut self, prompt: String) {
        let now_ms = unix_millis();
        let history: Vec<(ChatRole, String)> = self
            .state
            .user_data
            .chat_history
            .iter()
            .map(|message| (message.role, message.text.clone()))
            .collect();
        self.state
            .user_data
            .push_chat(ChatRole::User, &prompt, now_ms);
        self.state.mark_user_data_dirty();

        let profile = self.state.settings.ai.chat.clone();
        if !profile.has_key() {
            self.state.user_data.push_chat(
                ChatRole::Model,
                "错误：请先在\"设置\"中配置 AI 对话模型的 API Key。",
                now_ms,
            );
            return;
        }

        self.ai_worker.submit(AiTask::Chat {
            profile,
            prompt,
            history,
        });
        self.ai_pending += 1;
        if let Some(modal) = self.ai_modal.as_mut() {
            modal.chat_started();
        }
    }

    fn replace_ai_selection(&mut self, text: &str, now: f64) {
        match self.ai_selection {
            Some(range) => {
                if let Some(new_range) =
                    splice_byte_range(&mut self.state.user_data.content, range, text)
                {
                    self.ai_selection = Some(new_range);
                    self.state.mark_content_edited(now);
                }
            }
            None => self.state.append_content(text, now),
        }
    }

    fn request_auto_layout(&mut self) {
        let content = self.state.content().to_string();
        if content.chars().count() < MIN_LAYOUT_CHARS {
            self.state.show_alert("编辑器内容太少，请先输入文章内容");
            return;
        }
        let profile = self.state.settings.ai.chat.clone();
        if !profile.has_key() {
            self.state.show_alert("请先在\"设置\"中配置 AI API Key");
            return;
        }
        self.ai_worker.submit(AiTask::AutoLayout { profile, content });
        self.ai_pending += 1;
        if let Some(modal) = self.ai_modal.as_mut() {
            modal.layout_started();
        }
    }

    fn request_image(&mut self, prompt: String, size: ImageSize) {
        let profile = self.state.settings.ai.image_request_profile();
        if !profile.has_key() {
            self.state.show_alert("请先在\"设置\"中配置绘图 API Key");
            return;
        }
        self.ai_worker.submit(AiTask::GenerateImage {
            profile,
            prompt,
            size,
        });
        self.ai_pending += 1;
        if let Some(modal) = self.ai_modal.as_mut() {
            modal.image_started();
        }
    }

    // ───── Background AI results ─────

    fn drain_ai_events(&mut self) {
        for event in self.ai_worker.drain() {
            self.ai_pending = self.ai_pending.saturating_sub(1);
            match event {
                AiEvent::ChatReply(result) => {
                    if let Some(modal) = self.ai_modal.as_mut() {
                        modal.chat_finished();
                    }
                    let text = match result {
                        Ok(reply) => reply,
                        Err(err) => format!("请求失败: {err}"),
                    };
                    self.state
                        .user_data
                        .push_chat(ChatRole::Model, text, unix_millis());
                    self.state.mark_user_data_dirty();
                }
                AiEvent::LayoutReady(result) => match result {
                    Ok(markdown) => {
                        if let Some(modal) = self.ai_modal.as_mut() {
                            modal.layout_finished(Ok(markdown));
                        }
                    }
                    Err(err) => {
                        if let Some(modal) = self.ai_modal.as_mut() {
                            modal.layout_finished(Err(err.to_string()));
                        }
                        self.state.show_alert(format!("排版失败: {err}"));
                    }
                },
                AiEvent::ImageReady { prompt, result } => match result {
                    Ok(url) => {
                        self.state
                            .user_data
                            .push_image(&url, &prompt, unix_millis());
                        self.state.mark_user_data_dirty();
                        if let Some(modal) = self.ai_modal.as_mut() {
                            modal.image_finished(Ok(url));
                        }
                    }
                    Err(err) => {
                        if let Some(modal) = self.ai_modal.as_mut() {
                            modal.image_finished(Err(err.to_string()));
                        }
                        self.state.show_alert(format!("绘图失败: {err}"));
                    }
                },
                AiEvent::SkinCssReady { prompt, result } => match result {
                    Ok(css) => {
                        let skin = Skin::ai_generated(&prompt, &css, unix_millis());
                        let id = skin.id.clone();
                        self.state.skins.add(skin);
                        self.state.sync_skins();
                        self.state.select_skin(&id);
                        info!("generated skin {id} applied");
                        if let Some(modal) = self.skins_modal.as_mut() {
                            modal.generation_finished(Ok(()));
                        }
                    }
                    Err(err) => {
                        if let Some(modal) = self.skins_modal.as_mut() {
                            modal.generation_finished(Err(err.to_string()));
                        } else {
                            self.state.show_alert(format!("生成失败: {err}"));
                        }
                    }
                },
            }
        }
    }

    // ───── Clipboard export ─────

    fn copy_to_wechat(&mut self, now: f64) {
        // The preview may lag one frame behind the latest keystroke.
        self.refresh_preview();

        let mut sink = SystemClipboard::default();
        match self
            .exporter
            .export(&self.preview.tree, &self.preview.styles, &mut sink)
        {
            Ok(CopyOutcome::Copied) => {
                self.state
                    .show_toast("公众号格式复制成功！可直接粘贴到后台", now);
            }
            Ok(CopyOutcome::NothingToCopy) => {
                self.state.show_toast("暂无内容可复制", now);
            }
            Ok(CopyOutcome::Busy) => {}
            Err(err) => {
                warn!("clipboard export failed: {err}");
                self.state.show_alert("复制失败，请尝试手动复制");
            }
        }
    }

    // ───── Keyboard shortcuts ─────

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context, now: f64) {
        let action = ctx.input(|i| {
            if i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::C) {
                return Some(KeyboardAction::CopyToWechat);
            }
            if i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::S) {
                return Some(KeyboardAction::SaveDraft);
            }
            if i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::B) {
                return Some(KeyboardAction::Format(FormatCommand::Bold));
            }
            if i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::I) {
                return Some(KeyboardAction::Format(FormatCommand::Italic));
            }
            None
        });

        match action {
            Some(KeyboardAction::CopyToWechat) => self.copy_to_wechat(now),
            Some(KeyboardAction::SaveDraft) => {
                self.state.save_draft(unix_millis());
                self.state.save_user_data_if_dirty();
                self.state.show_toast("草稿已保存", now);
            }
            Some(KeyboardAction::Format(command)) => {
                self.apply_format_shortcut(ctx, command, now);
            }
            None => {}
        }
    }

    fn apply_format_shortcut(&mut self, ctx: &egui::Context, command: FormatCommand, now: f64) {
        let Some(selection) = self
            .editor_selection
            .or(self.editor_caret.map(|caret| (caret, caret)))
        else {
            return;
        };
        let new_selection =
            apply_command(ctx, &mut self.state.user_data.content, selection, command);
        self.editor_selection = (new_selection.0 != new_selection.1).then_some(new_selection);
        self.editor_caret = Some(new_selection.0);
        self.state.mark_content_edited(now);
    }

    // ───── Confirm / alert / toast layer ─────

    fn show_dialog_layer(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        if self.state.ui.show_confirm_dialog {
            let message = self.state.ui.confirm_dialog_message.clone();
            match show_confirm_dialog(ctx, &message, colors.is_dark()) {
                ConfirmChoice::Confirmed => {
                    self.state.handle_confirmed_action();
                    // A confirmed settings reset can change the theme.
                    self.theme_manager.set_theme(self.state.settings.general.theme);
                }
                ConfirmChoice::Cancelled => self.state.cancel_pending_action(),
                ConfirmChoice::None => {}
            }
        }

        if let Some(message) = self.state.ui.alert_message.clone() {
            if show_alert_dialog(ctx, &message, colors.is_dark()) {
                self.state.dismiss_alert();
            }
        }

        if let Some(message) = self.state.ui.toast_message.clone() {
            show_toast(ctx, &message);
        }
    }
}

impl eframe::App for PixelMarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::handle_window_resize(ctx, &mut self.window_resize_state);
        self.theme_manager.apply_if_needed(ctx);

        let now = self.app_time();
        self.state.update_toast(now);
        self.update_window_state(ctx);
        self.drain_ai_events();
        self.refresh_preview();

        self.render_ui(ctx, now);

        // Shortcuts run after rendering so they see this frame's selection.
        if self.state.settings.general.enable_shortcuts
            && self.state.ui.active_modal == Modal::None
        {
            self.handle_keyboard_shortcuts(ctx, now);
        }

        self.state.maybe_auto_save(now);

        // Keep polling while background work or a transient toast is live.
        if self.ai_pending > 0 {
            ctx.request_repaint_after(Duration::from_millis(150));
        } else if self.state.ui.toast_message.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("shutting down, persisting state");
        self.state.shutdown();
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.state.save_settings_if_dirty();
    }
}

// ───── Helpers ─────

fn content_stamp(content: &str, skin_css: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    skin_css.hash(&mut hasher);
    hasher.finish()
}

fn clamp_split_ratio(ratio: f32) -> f32 {
    ratio.clamp(Settings::MIN_SPLIT_RATIO, Settings::MAX_SPLIT_RATIO)
}

/// Replace `range` (a byte range) in `content` with `text`, returning the
/// byte range of the inserted text. Out-of-bounds or non-boundary ranges are
/// rejected rather than snapped.
fn splice_byte_range(
    content: &mut String,
    range: (usize, usize),
    text: &str,
) -> Option<(usize, usize)> {
    let (start, end) = range;
    if start > end || end > content.len() {
        return None;
    }
    if !content.is_char_boundary(start) || !content.is_char_boundary(end) {
        return None;
    }
    content.replace_range(start..end, text);
    Some((start, start + text.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_stamp_tracks_inputs() {
        let base = content_stamp("# 标题", "h1 { color: red; }");
        assert_eq!(base, content_stamp("# 标题", "h1 { color: red; }"));
        assert_ne!(base, content_stamp("# 标题改", "h1 { color: red; }"));
        assert_ne!(base, content_stamp("# 标题", "h1 { color: blue; }"));
    }

    #[test]
    fn test_splice_byte_range_replaces_selection() {
        let mut content = String::from("Hello world");
        let range = splice_byte_range(&mut content, (0, 5), "你好");
        assert_eq!(content, "你好 world");
        assert_eq!(range, Some((0, "你好".len())));
    }

    #[test]
    fn test_splice_byte_range_rejects_bad_ranges() {
        let mut content = String::from("你好");
        // Inside a multi-byte character.
        assert!(splice_byte_range(&mut content, (1, 3), "x").is_none());
        // Past the end.
        assert!(splice_byte_range(&mut content, (0, 99), "x").is_none());
        assert_eq!(content, "你好");
    }

    #[test]
    fn test_clamp_split_ratio_bounds() {
        assert_eq!(clamp_split_ratio(0.05), Settings::MIN_SPLIT_RATIO);
        assert_eq!(clamp_split_ratio(0.95), Settings::MAX_SPLIT_RATIO);
        assert_eq!(clamp_split_ratio(0.5), 0.5);
    }
}
