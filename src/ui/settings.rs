//! Settings modal for PixelMark (系统全局设置)
//!
//! Three tabs: configuration/data management (import, export, drafts,
//! factory reset), basic editor options, and the two AI profiles with
//! connection tests. The modal edits a working copy and only commits it
//! when the user saves, so cancelling never leaves half-applied settings.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use eframe::egui::{self, Color32, RichText, Ui, Vec2};

use crate::ai::{AiClient, AiProfile, ImageSize, Provider};
use crate::config::{Draft, Settings, Theme};
use crate::string_utils::format_relative_time;
use crate::theme::ThemeColors;
use crate::ui::dialogs::modal_overlay;

/// Prompt sent by the chat connection test.
const TEST_CHAT_PROMPT: &str = "你好";

/// Prompt sent by the drawing connection test.
const TEST_IMAGE_PROMPT: &str = "一个像素风的盒子";

/// Settings modal tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    /// Import/export, drafts and factory reset
    #[default]
    Data,
    /// Editor and interface options
    General,
    /// AI profiles and connection tests
    Ai,
}

impl SettingsTab {
    pub fn label(&self) -> &'static str {
        match self {
            SettingsTab::Data => "配置与数据",
            SettingsTab::General => "基础设置",
            SettingsTab::Ai => "AI 全局配置",
        }
    }

    pub fn all() -> [SettingsTab; 3] {
        [SettingsTab::Data, SettingsTab::General, SettingsTab::Ai]
    }
}

/// Which profile a connection test probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TestTarget {
    Chat,
    Image,
}

/// Lifecycle of one connection test.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum TestStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed(String),
}

/// Result of showing the settings modal.
#[derive(Debug, Clone, Default)]
pub struct SettingsModalOutput {
    /// Sanitized settings to apply, present after 保存设置
    pub saved: Option<Settings>,
    /// Whether the modal should be closed
    pub close_requested: bool,
    /// Whether a factory reset was requested (needs confirmation)
    pub reset_requested: bool,
    /// Export settings to a user-chosen file
    pub export_config: bool,
    /// Import settings from a user-chosen file
    pub import_config: bool,
    /// Export user data to a user-chosen file
    pub export_user_data: bool,
    /// Import user data from a user-chosen file
    pub import_user_data: bool,
    /// Id of a draft to restore into the editor
    pub restore_draft: Option<String>,
    /// Id of a draft to delete (needs confirmation)
    pub delete_draft: Option<String>,
}

/// Settings modal state: active tab, the working copy being edited, and
/// the channel connection tests report back on.
pub struct SettingsModal {
    active_tab: SettingsTab,
    draft: Settings,
    chat_test: TestStatus,
    image_test: TestStatus,
    test_tx: Sender<(TestTarget, Result<(), String>)>,
    test_rx: Receiver<(TestTarget, Result<(), String>)>,
}

impl SettingsModal {
    /// Open the modal with a working copy of the current settings.
    pub fn new(settings: &Settings) -> Self {
        let (test_tx, test_rx) = mpsc::channel();
        Self {
            active_tab: SettingsTab::default(),
            draft: settings.clone(),
            chat_test: TestStatus::default(),
            image_test: TestStatus::default(),
            test_tx,
            test_rx,
        }
    }

    /// The working copy, sanitized for applying.
    fn commit(&self) -> Settings {
        let mut settings = self.draft.clone();
        settings.sanitize();
        settings
    }

    /// Probe the working copy's profile on a background thread. Results
    /// arrive through the test channel and are drained in [`show`].
    fn spawn_test(&mut self, target: TestTarget) {
        match target {
            TestTarget::Chat => self.chat_test = TestStatus::Running,
            TestTarget::Image => self.image_test = TestStatus::Running,
        }

        let profile = match target {
            TestTarget::Chat => self.draft.ai.chat.clone(),
            TestTarget::Image => self.draft.ai.image_request_profile(),
        };
        let tx = self.test_tx.clone();
        thread::spawn(move || {
            let result = run_connection_test(target, &profile);
            // The receiver only disappears when the modal is dropped.
            let _ = tx.send((target, result));
        });
    }

    /// Show the modal.
    ///
    /// `drafts` is the saved-draft list for the data tab and `now_ms` the
    /// current wall-clock time for relative timestamps.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        drafts: &[Draft],
        now_ms: u64,
        colors: &ThemeColors,
    ) -> SettingsModalOutput {
        let mut output = SettingsModalOutput::default();

        let finished: Vec<_> = self.test_rx.try_iter().collect();
        for (target, result) in finished {
            let status = match result {
                Ok(()) => TestStatus::Succeeded,
                Err(message) => TestStatus::Failed(message),
            };
            match target {
                TestTarget::Chat => self.chat_test = status,
                TestTarget::Image => self.image_test = status,
            }
        }

        if modal_overlay(ctx, "settings_overlay", colors.is_dark()) {
            output.close_requested = true;
        }

        egui::Window::new("系统全局设置")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(540.0)
            .max_width(600.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                // Tab bar
                ui.horizontal(|ui| {
                    for tab in SettingsTab::all() {
                        let selected = self.active_tab == tab;
                        if ui
                            .selectable_label(selected, RichText::new(tab.label()).size(13.0))
                            .clicked()
                        {
                            self.active_tab = tab;
                        }
                    }
                });
                ui.separator();

                egui::ScrollArea::vertical()
                    .id_source("settings_content")
                    .max_height(420.0)
                    .show(ui, |ui| {
                        ui.set_min_width(520.0);
                        ui.set_min_height(360.0);
                        ui.add_space(8.0);

                        match self.active_tab {
                            SettingsTab::Data => {
                                self.show_data_tab(ui, drafts, now_ms, colors, &mut output);
                            }
                            SettingsTab::General => self.show_general_tab(ui),
                            SettingsTab::Ai => self.show_ai_tab(ui, colors),
                        }
                    });

                ui.separator();

                // Footer: 取消 | 保存设置
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let save = ui.add(
                            egui::Button::new(
                                RichText::new("保存设置").color(Color32::WHITE).strong(),
                            )
                            .fill(colors.ui.accent)
                            .min_size(Vec2::new(88.0, 28.0)),
                        );
                        if save.clicked() {
                            output.saved = Some(self.commit());
                            output.close_requested = true;
                        }

                        if ui
                            .add(egui::Button::new("取消").min_size(Vec2::new(64.0, 28.0)))
                            .clicked()
                        {
                            output.close_requested = true;
                        }
                    });
                });
            });

        output
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 配置与数据
    // ─────────────────────────────────────────────────────────────────────────

    fn show_data_tab(
        &mut self,
        ui: &mut Ui,
        drafts: &[Draft],
        now_ms: u64,
        colors: &ThemeColors,
        output: &mut SettingsModalOutput,
    ) {
        section_heading(ui, "配置文件管理 (JSON)");
        ui.label(
            RichText::new("包含所有设置项、API Key、字数统计规则等系统级配置。")
                .size(12.0)
                .color(colors.text.muted),
        );
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("导出配置").clicked() {
                output.export_config = true;
            }
            if ui.button("导入配置").clicked() {
                output.import_config = true;
            }
        });

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(12.0);

        section_heading(ui, "用户数据备份 (JSON)");
        ui.label(
            RichText::new("包含所有文章草稿、收藏主题、AI历史记录、自定义片段库。")
                .size(12.0)
                .color(colors.text.muted),
        );
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("导出用户数据").clicked() {
                output.export_user_data = true;
            }
            if ui.button("导入用户数据").clicked() {
                output.import_user_data = true;
            }
        });

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(12.0);

        section_heading(ui, &format!("草稿管理 ({})", drafts.len()));
        if drafts.is_empty() {
            ui.label(RichText::new("暂无草稿").size(12.0).color(colors.text.muted));
        } else {
            egui::ScrollArea::vertical()
                .id_source("settings_drafts")
                .max_height(150.0)
                .show(ui, |ui| {
                    for draft in drafts {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(draft.title()).size(13.0));
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.small_button("删除").clicked() {
                                        output.delete_draft = Some(draft.id.clone());
                                    }
                                    if ui.small_button("恢复").clicked() {
                                        output.restore_draft = Some(draft.id.clone());
                                        output.close_requested = true;
                                    }
                                    ui.label(
                                        RichText::new(format_relative_time(
                                            draft.saved_at,
                                            now_ms,
                                        ))
                                        .size(11.0)
                                        .color(colors.text.muted),
                                    );
                                },
                            );
                        });
                    }
                });
        }

        ui.add_space(20.0);

        ui.vertical_centered(|ui| {
            let link = ui.add(
                egui::Label::new(
                    RichText::new("恢复编辑器默认出厂设置")
                        .size(12.0)
                        .color(colors.ui.error)
                        .underline(),
                )
                .sense(egui::Sense::click()),
            );
            if link.clicked() {
                output.reset_requested = true;
            }
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 基础设置
    // ─────────────────────────────────────────────────────────────────────────

    fn show_general_tab(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("编辑区字体大小").size(12.0).strong());
        ui.add_space(2.0);
        egui::ComboBox::from_id_source("settings_font_size")
            .selected_text(font_size_label(self.draft.editor.font_size))
            .width(180.0)
            .show_ui(ui, |ui| {
                for (size, label) in [
                    (12.0, "12px (小)"),
                    (14.0, "14px (标准)"),
                    (16.0, "16px (大)"),
                    (18.0, "18px (特大)"),
                ] {
                    ui.selectable_value(&mut self.draft.editor.font_size, size, label);
                }
            });

        ui.add_space(10.0);

        ui.label(RichText::new("缩进大小 (Tab)").size(12.0).strong());
        ui.add_space(2.0);
        egui::ComboBox::from_id_source("settings_tab_size")
            .selected_text(tab_size_label(self.draft.editor.tab_size))
            .width(180.0)
            .show_ui(ui, |ui| {
                for (size, label) in [(2u8, "2 个字符"), (4u8, "4 个字符")] {
                    ui.selectable_value(&mut self.draft.editor.tab_size, size, label);
                }
            });

        ui.add_space(10.0);

        ui.label(RichText::new("界面主题").size(12.0).strong());
        ui.add_space(2.0);
        ui.horizontal(|ui| {
            for theme in Theme::all() {
                ui.selectable_value(&mut self.draft.general.theme, *theme, theme.label());
            }
        });

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(8.0);

        ui.checkbox(&mut self.draft.editor.show_line_numbers, "显示行号");
        ui.add_space(4.0);
        ui.checkbox(&mut self.draft.editor.auto_save, "自动保存 (每5秒)");
        ui.add_space(4.0);
        ui.checkbox(&mut self.draft.editor.paste_plain_text, "默认粘贴为纯文本");
        ui.add_space(4.0);
        ui.checkbox(&mut self.draft.general.show_status_bar, "显示底部状态栏");
        ui.add_space(4.0);
        ui.checkbox(
            &mut self.draft.general.enable_shortcuts,
            "启用快捷键 (Ctrl+S等)",
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI 全局配置
    // ─────────────────────────────────────────────────────────────────────────

    fn show_ai_tab(&mut self, ui: &mut Ui, colors: &ThemeColors) {
        section_heading(ui, "AI 对话模型配置 (文本/排版)");

        provider_row(ui, &mut self.draft.ai.chat.provider);
        labeled_field(
            ui,
            "模型选择 (Model Name)",
            &mut self.draft.ai.chat.chat_model,
            "例如: gemini-3-flash-preview",
            false,
        );
        labeled_field(
            ui,
            "API 密钥 (API Key)",
            &mut self.draft.ai.chat.api_key,
            "输入您的 API Key...",
            true,
        );
        labeled_field(
            ui,
            "Base URL (可选 - 用于自定义代理)",
            &mut self.draft.ai.chat.base_url,
            "例如: https://my-openai-proxy.com",
            false,
        );

        ui.label(RichText::new("生成温度 (Temperature)").size(12.0).strong());
        ui.add_space(2.0);
        ui.add(
            egui::Slider::new(
                &mut self.draft.ai.chat.temperature,
                0.0..=Settings::MAX_TEMPERATURE,
            )
            .step_by(0.1),
        );
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    self.chat_test != TestStatus::Running,
                    egui::Button::new("测试对话接口"),
                )
                .clicked()
            {
                self.spawn_test(TestTarget::Chat);
            }
            show_test_status(ui, &self.chat_test, TestTarget::Chat, colors);
        });

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(12.0);

        section_heading(ui, "AI 绘图模型配置");

        provider_row(ui, &mut self.draft.ai.image.provider);
        labeled_field(
            ui,
            "绘图模型 (Model Name)",
            &mut self.draft.ai.image.image_model,
            "例如: imagen-4.0-generate-001 或 gemini-2.5-flash-image",
            false,
        );
        labeled_field(
            ui,
            "API 密钥",
            &mut self.draft.ai.image.api_key,
            "输入绘图专用 Key (如相同可留空)",
            true,
        );
        ui.label(
            RichText::new("*如果留空，将默认使用上方的对话 API Key")
                .size(11.0)
                .color(colors.text.muted),
        );
        ui.add_space(8.0);
        labeled_field(
            ui,
            "Base URL (可选)",
            &mut self.draft.ai.image.base_url,
            "自定义绘图接口代理地址",
            false,
        );

        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    self.image_test != TestStatus::Running,
                    egui::Button::new("测试绘图接口"),
                )
                .clicked()
            {
                self.spawn_test(TestTarget::Image);
            }
            show_test_status(ui, &self.image_test, TestTarget::Image, colors);
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn run_connection_test(target: TestTarget, profile: &AiProfile) -> Result<(), String> {
    let outcome = AiClient::new().and_then(|client| match target {
        TestTarget::Chat => client.chat(profile, TEST_CHAT_PROMPT, &[]).map(|_| ()),
        TestTarget::Image => client
            .generate_image(profile, TEST_IMAGE_PROMPT, ImageSize::Square)
            .map(|_| ()),
    });
    outcome.map_err(|err| err.to_string())
}

fn show_test_status(ui: &mut Ui, status: &TestStatus, target: TestTarget, colors: &ThemeColors) {
    let (text, color) = match (status, target) {
        (TestStatus::Idle, _) => return,
        (TestStatus::Running, TestTarget::Chat) => {
            (String::from("正在测试 Chat 接口..."), colors.text.muted)
        }
        (TestStatus::Running, TestTarget::Image) => {
            (String::from("正在测试绘图接口..."), colors.text.muted)
        }
        (TestStatus::Succeeded, TestTarget::Chat) => {
            (String::from("Chat 接口连接成功！"), colors.ui.success)
        }
        (TestStatus::Succeeded, TestTarget::Image) => {
            (String::from("绘图接口连接成功！"), colors.ui.success)
        }
        (TestStatus::Failed(msg), TestTarget::Chat) => {
            (format!("Chat 测试失败: {}", msg), colors.ui.error)
        }
        (TestStatus::Failed(msg), TestTarget::Image) => {
            (format!("绘图测试失败: {}", msg), colors.ui.error)
        }
    };
    ui.label(RichText::new(text).size(12.0).color(color));
}

fn section_heading(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).size(14.0).strong());
    ui.add_space(6.0);
}

fn labeled_field(ui: &mut Ui, label: &str, value: &mut String, hint: &str, password: bool) {
    ui.label(RichText::new(label).size(12.0).strong());
    ui.add_space(2.0);
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .password(password)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);
}

fn provider_row(ui: &mut Ui, provider: &mut Provider) {
    ui.label(RichText::new("接口类型").size(12.0).strong());
    ui.add_space(2.0);
    ui.horizontal(|ui| {
        for p in Provider::all() {
            ui.selectable_value(provider, p, p.label());
        }
    });
    ui.add_space(8.0);
}

fn font_size_label(size: f32) -> String {
    match size as u32 {
        12 => String::from("12px (小)"),
        14 => String::from("14px (标准)"),
        16 => String::from("16px (大)"),
        18 => String::from("18px (特大)"),
        other => format!("{}px", other),
    }
}

fn tab_size_label(size: u8) -> String {
    format!("{} 个字符", size)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_tab_is_data() {
        let modal = SettingsModal::new(&Settings::default());
        assert_eq!(modal.active_tab, SettingsTab::Data);
        assert_eq!(modal.chat_test, TestStatus::Idle);
        assert_eq!(modal.image_test, TestStatus::Idle);
    }

    #[test]
    fn test_tab_labels() {
        assert_eq!(SettingsTab::Data.label(), "配置与数据");
        assert_eq!(SettingsTab::General.label(), "基础设置");
        assert_eq!(SettingsTab::Ai.label(), "AI 全局配置");
    }

    #[test]
    fn test_working_copy_is_independent() {
        let mut settings = Settings::default();
        settings.editor.font_size = 16.0;

        let mut modal = SettingsModal::new(&settings);
        modal.draft.editor.font_size = 18.0;

        // Editing the copy must not touch the original
        assert_eq!(settings.editor.font_size, 16.0);
        assert_eq!(modal.commit().editor.font_size, 18.0);
    }

    #[test]
    fn test_commit_sanitizes() {
        let mut modal = SettingsModal::new(&Settings::default());
        modal.draft.editor.font_size = 99.0;
        modal.draft.general.split_ratio = 1.5;

        let committed = modal.commit();
        assert_eq!(committed.editor.font_size, Settings::MAX_FONT_SIZE);
        assert_eq!(committed.general.split_ratio, Settings::MAX_SPLIT_RATIO);
    }

    #[test]
    fn test_font_size_label_presets_and_custom() {
        assert_eq!(font_size_label(14.0), "14px (标准)");
        assert_eq!(font_size_label(18.0), "18px (特大)");
        assert_eq!(font_size_label(13.0), "13px");
    }

    #[test]
    fn test_tab_size_label() {
        assert_eq!(tab_size_label(2), "2 个字符");
        assert_eq!(tab_size_label(4), "4 个字符");
    }

    #[test]
    fn test_connection_test_without_key_fails_fast() {
        // Keyless profiles are rejected before any I/O
        let result = run_connection_test(TestTarget::Chat, &AiProfile::default_chat());
        let message = result.unwrap_err();
        assert!(message.contains("请先"), "unexpected message: {message}");
    }

    #[test]
    fn test_spawn_test_reports_through_channel() {
        let mut modal = SettingsModal::new(&Settings::default());
        modal.spawn_test(TestTarget::Chat);
        assert_eq!(modal.chat_test, TestStatus::Running);

        let (target, result) = modal
            .test_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("test thread should report back");
        assert_eq!(target, TestTarget::Chat);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_default_is_inert() {
        let output = SettingsModalOutput::default();
        assert!(output.saved.is_none());
        assert!(!output.close_requested);
        assert!(!output.reset_requested);
        assert!(!output.export_config);
        assert!(output.restore_draft.is_none());
        assert!(output.delete_draft.is_none());
    }

    #[test]
    fn test_modal_renders_headless() {
        let ctx = egui::Context::default();
        let mut modal = SettingsModal::new(&Settings::default());

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let output = modal.show(ctx, &[], 0, &ThemeColors::light());
            assert!(output.saved.is_none());
            assert!(!output.close_requested);
        });
    }
}
