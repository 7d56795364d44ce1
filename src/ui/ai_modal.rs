//! AI assistant modal for PixelMark (AI 智能助手)
//!
//! Three tabs: chat assistant, one-shot article re-layout, and image
//! generation. The modal owns only view state (input buffers, busy flags,
//! the pending layout result); chat history lives in `UserData` and every
//! request goes through the app, which submits worker tasks and reports
//! completions back via the `*_started` / `*_finished` methods.

use eframe::egui::{self, Color32, RichText, TextureHandle, Ui, Vec2};

use crate::ai::{ChatRole, ImageSize};
use crate::config::ChatMessage;
use crate::theme::ThemeColors;
use crate::ui::dialogs::modal_overlay;

/// Quick prompts above the chat input.
const PRESET_COMMANDS: [&str; 8] = [
    "检查错别字",
    "修正病句",
    "润色文章",
    "生成文章摘要",
    "提取要点",
    "扩写段落",
    "生成公众号标题",
    "转换为正式风格",
];

/// Greeting shown while the chat history is still empty. Not persisted.
const WELCOME_TEXT: &str = "你好！我是你的 AI 写作助手。我可以帮你润色文章、检查错别字、生成标题，或者创作配图。\n请在下方输入指令，或选择预设指令。";

/// A preset command needs some text to work on.
const SELECT_TEXT_FIRST: &str = "请先在左侧编辑器选中需要处理的文字";

/// Below this many characters a preset command takes the whole article.
const PRESET_FULL_TEXT_LIMIT: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiTab {
    #[default]
    Chat,
    Layout,
    Draw,
}

impl AiTab {
    pub fn all() -> [AiTab; 3] {
        [AiTab::Chat, AiTab::Layout, AiTab::Draw]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AiTab::Chat => "对话助手",
            AiTab::Layout => "智能排版",
            AiTab::Draw => "AI 绘图",
        }
    }
}

/// Result of showing the AI modal.
#[derive(Debug, Clone, Default)]
pub struct AiModalOutput {
    /// Whether the modal should be closed
    pub close_requested: bool,
    /// Chat prompt to submit
    pub send_chat: Option<String>,
    /// Clear the chat history (needs confirmation)
    pub clear_history: bool,
    /// A reply was copied to the clipboard
    pub copied_reply: bool,
    /// Append a reply to the end of the article
    pub insert_text: Option<String>,
    /// Replace the editor selection with this reply
    pub replace_selection: Option<String>,
    /// Start the automatic re-layout of the article
    pub start_layout: bool,
    /// Replace the whole article with the re-layouted markdown
    pub apply_layout: Option<String>,
    /// Submit an image generation request: (prompt, size)
    pub generate_image: Option<(String, ImageSize)>,
    /// Insert the generated image into the article
    pub insert_image: Option<String>,
    /// Open the generated image outside the editor
    pub open_image: Option<String>,
    /// Message the app should show as a blocking alert
    pub alert: Option<String>,
}

/// AI assistant modal state.
pub struct AiModal {
    active_tab: AiTab,

    // Chat
    chat_input: String,
    chat_busy: bool,

    // Layout
    layout_busy: bool,
    layout_result: Option<String>,

    // Drawing
    image_prompt: String,
    image_size: ImageSize,
    image_busy: bool,
    image_url: Option<String>,
}

impl AiModal {
    /// Open the modal. A non-empty editor selection prefills the chat input;
    /// the most recent generated image (if any) seeds the drawing preview.
    pub fn new(selection: &str, last_image: Option<&str>) -> Self {
        let chat_input = if selection.trim().is_empty() {
            String::new()
        } else {
            format!("请帮我优化这段文字：\n\"{selection}\"")
        };

        Self {
            active_tab: AiTab::Chat,
            chat_input,
            chat_busy: false,
            layout_busy: false,
            layout_result: None,
            image_prompt: String::new(),
            image_size: ImageSize::default(),
            image_busy: false,
            image_url: last_image.map(String::from),
        }
    }

    // ── Completion hooks, called by the app after worker events ──

    pub fn chat_started(&mut self) {
        self.chat_busy = true;
    }

    pub fn chat_finished(&mut self) {
        self.chat_busy = false;
    }

    pub fn layout_started(&mut self) {
        self.layout_busy = true;
    }

    /// The layout result stays in the modal until the user applies it.
    pub fn layout_finished(&mut self, result: Result<String, String>) {
        self.layout_busy = false;
        if let Ok(markdown) = result {
            self.layout_result = Some(markdown);
        }
    }

    pub fn image_started(&mut self) {
        self.image_busy = true;
    }

    pub fn image_finished(&mut self, result: Result<String, String>) {
        self.image_busy = false;
        if let Ok(url) = result {
            self.image_url = Some(url);
        }
    }

    /// Build the prompt for a preset command, following the same rules as
    /// typing one: prefer the selection, fall back to a short article.
    fn preset_prompt(
        cmd: &str,
        selection: &str,
        content: &str,
    ) -> Result<String, &'static str> {
        if !selection.trim().is_empty() {
            Ok(format!("{cmd}：\n\"{selection}\""))
        } else if content.chars().count() < PRESET_FULL_TEXT_LIMIT {
            Ok(format!("{cmd}，针对以下全文：\n\"{content}\""))
        } else {
            Err(SELECT_TEXT_FIRST)
        }
    }

    /// Show the modal.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        history: &[ChatMessage],
        selection: &str,
        content: &str,
        colors: &ThemeColors,
    ) -> AiModalOutput {
        let mut output = AiModalOutput::default();

        if modal_overlay(ctx, "ai_overlay", colors.is_dark()) {
            output.close_requested = true;
        }

        egui::Window::new("AI 智能助手")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(560.0)
            .max_width(620.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                // Tab bar
                ui.horizontal(|ui| {
                    for tab in AiTab::all() {
                        if ui
                            .selectable_label(self.active_tab == tab, tab.label())
                            .clicked()
                        {
                            self.active_tab = tab;
                        }
                    }
                });
                ui.separator();

                match self.active_tab {
                    AiTab::Chat => {
                        self.show_chat_tab(ui, history, selection, content, colors, &mut output)
                    }
                    AiTab::Layout => self.show_layout_tab(ui, colors, &mut output),
                    AiTab::Draw => self.show_draw_tab(ui, colors, &mut output),
                }
            });

        output
    }

    // ─────────────────────────────────────────────────────────────────────
    // Chat tab
    // ─────────────────────────────────────────────────────────────────────

    fn show_chat_tab(
        &mut self,
        ui: &mut Ui,
        history: &[ChatMessage],
        selection: &str,
        content: &str,
        colors: &ThemeColors,
        output: &mut AiModalOutput,
    ) {
        // History
        egui::Frame::none()
            .fill(colors.base.background_secondary)
            .rounding(egui::Rounding::same(4.0))
            .inner_margin(egui::Margin::same(8.0))
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_source("ai_chat_history")
                    .max_height(280.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        ui.set_min_height(280.0);
                        ui.set_min_width(540.0);

                        if history.is_empty() && !self.chat_busy {
                            self.show_model_bubble(ui, WELCOME_TEXT, false, "", colors, output);
                        }
                        for message in history {
                            match message.role {
                                ChatRole::User => self.show_user_bubble(ui, &message.text, colors),
                                ChatRole::Model => self.show_model_bubble(
                                    ui,
                                    &message.text,
                                    true,
                                    selection,
                                    colors,
                                    output,
                                ),
                            }
                        }
                        if self.chat_busy {
                            ui.label(
                                RichText::new("AI 正在思考中...")
                                    .size(12.0)
                                    .color(colors.text.muted),
                            );
                        }
                    });
            });

        ui.add_space(6.0);

        // Preset commands
        egui::ScrollArea::horizontal()
            .id_source("ai_presets")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for cmd in PRESET_COMMANDS {
                        if ui.small_button(cmd).clicked() {
                            match Self::preset_prompt(cmd, selection, content) {
                                Ok(prompt) => self.chat_input = prompt,
                                Err(message) => output.alert = Some(message.to_string()),
                            }
                        }
                    }
                });
            });

        ui.add_space(6.0);

        // Input row. Enter sends, Shift+Enter inserts a newline.
        let input_id = egui::Id::new("ai_chat_input");
        let send_via_enter = ui.ctx().memory(|m| m.has_focus(input_id))
            && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

        ui.horizontal(|ui| {
            ui.add_sized(
                Vec2::new(ui.available_width() - 76.0, 60.0),
                egui::TextEdit::multiline(&mut self.chat_input)
                    .id(input_id)
                    .hint_text("输入你的需求（Shift+Enter 换行）..."),
            );

            ui.vertical(|ui| {
                let can_send = !self.chat_busy && !self.chat_input.trim().is_empty();
                let send_button = egui::Button::new(RichText::new("发送").color(Color32::WHITE))
                    .fill(colors.ui.accent)
                    .min_size(Vec2::new(64.0, 34.0));
                let clicked = ui.add_enabled(can_send, send_button).clicked();
                if (clicked || send_via_enter) && can_send {
                    output.send_chat = Some(self.chat_input.trim().to_string());
                    self.chat_input.clear();
                }

                if !history.is_empty() {
                    let clear = egui::Button::new(
                        RichText::new("清空历史").size(11.0).color(colors.text.muted),
                    )
                    .frame(false);
                    if ui.add(clear).clicked() {
                        output.clear_history = true;
                    }
                }
            });
        });
    }

    fn show_user_bubble(&self, ui: &mut Ui, text: &str, colors: &ThemeColors) {
        ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
            egui::Frame::none()
                .fill(colors.ui.accent.gamma_multiply(0.18))
                .rounding(egui::Rounding::same(6.0))
                .inner_margin(egui::Margin::symmetric(10.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(440.0);
                    ui.label(RichText::new(text).size(13.0).color(colors.text.primary));
                });
            ui.label(RichText::new("我").size(10.0).color(colors.text.muted));
        });
        ui.add_space(4.0);
    }

    fn show_model_bubble(
        &self,
        ui: &mut Ui,
        text: &str,
        with_actions: bool,
        selection: &str,
        colors: &ThemeColors,
        output: &mut AiModalOutput,
    ) {
        ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
            egui::Frame::none()
                .fill(colors.base.background_tertiary)
                .rounding(egui::Rounding::same(6.0))
                .inner_margin(egui::Margin::symmetric(10.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(440.0);
                    ui.label(RichText::new(text).size(13.0).color(colors.text.primary));

                    if with_actions {
                        ui.add_space(4.0);
                        ui.horizontal(|ui| {
                            if ui.small_button("复制").clicked() {
                                ui.output_mut(|o| o.copied_text = text.to_string());
                                output.copied_reply = true;
                            }
                            if !selection.trim().is_empty()
                                && ui.small_button("替换选中").clicked()
                            {
                                output.replace_selection = Some(text.to_string());
                                output.close_requested = true;
                            }
                            if ui.small_button("插入文末").clicked() {
                                output.insert_text = Some(text.to_string());
                            }
                        });
                    }
                });
            ui.label(RichText::new("AI 助手").size(10.0).color(colors.text.muted));
        });
        ui.add_space(4.0);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layout tab
    // ─────────────────────────────────────────────────────────────────────

    fn show_layout_tab(&mut self, ui: &mut Ui, colors: &ThemeColors, output: &mut AiModalOutput) {
        match self.layout_result.clone() {
            None => {
                ui.add_space(32.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("AI 智能排版优化").size(16.0).strong());
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(
                            "自动识别文章结构，优化标题层级 (H1-H2)，拆分过长段落，\n\
                             添加引用块与列表，并调整符合公众号阅读习惯的间距。",
                        )
                        .size(12.0)
                        .color(colors.text.secondary),
                    );
                    ui.add_space(16.0);

                    let label = if self.layout_busy {
                        "正在分析排版中..."
                    } else {
                        "开始一键排版"
                    };
                    let button = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                        .fill(colors.ui.accent)
                        .min_size(Vec2::new(160.0, 36.0));
                    if ui.add_enabled(!self.layout_busy, button).clicked() {
                        output.start_layout = true;
                    }
                });
                ui.add_space(32.0);
            }
            Some(markdown) => {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("排版预览")
                            .size(13.0)
                            .strong()
                            .color(colors.ui.success),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let back = egui::Button::new(
                            RichText::new("< 返回重新排版").size(11.0).color(colors.text.link),
                        )
                        .frame(false);
                        if ui.add(back).clicked() {
                            self.layout_result = None;
                        }
                    });
                });

                egui::Frame::none()
                    .fill(colors.base.background_secondary)
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::same(8.0))
                    .show(ui, |ui| {
                        egui::ScrollArea::vertical()
                            .id_source("ai_layout_preview")
                            .max_height(300.0)
                            .show(ui, |ui| {
                                ui.set_min_width(540.0);
                                ui.label(
                                    RichText::new(&markdown)
                                        .monospace()
                                        .size(12.0)
                                        .color(colors.text.primary),
                                );
                            });
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let retry = egui::Button::new(if self.layout_busy {
                        "正在分析排版中..."
                    } else {
                        "重新生成"
                    })
                    .min_size(Vec2::new(120.0, 30.0));
                    if ui.add_enabled(!self.layout_busy, retry).clicked() {
                        output.start_layout = true;
                    }

                    let apply =
                        egui::Button::new(RichText::new("确认应用到编辑器").color(Color32::WHITE))
                            .fill(colors.ui.success)
                            .min_size(Vec2::new(140.0, 30.0));
                    if ui.add(apply).clicked() {
                        output.apply_layout = Some(markdown);
                        output.close_requested = true;
                    }
                });
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Drawing tab
    // ─────────────────────────────────────────────────────────────────────

    fn show_draw_tab(&mut self, ui: &mut Ui, colors: &ThemeColors, output: &mut AiModalOutput) {
        ui.horizontal_top(|ui| {
            // Controls
            ui.vertical(|ui| {
                ui.set_width(200.0);

                ui.label(RichText::new("画面描述 (Prompt)").size(12.0).strong());
                ui.add(
                    egui::TextEdit::multiline(&mut self.image_prompt)
                        .hint_text("例如：一张像素风的公众号封面，画面中有书桌、咖啡和电脑，暖色调...")
                        .desired_rows(5)
                        .desired_width(200.0),
                );

                ui.add_space(8.0);
                ui.label(RichText::new("图片比例").size(12.0).strong());
                egui::ComboBox::from_id_source("ai_image_size")
                    .width(200.0)
                    .selected_text(self.image_size.label())
                    .show_ui(ui, |ui| {
                        for size in ImageSize::all() {
                            ui.selectable_value(&mut self.image_size, size, size.label());
                        }
                    });

                ui.add_space(12.0);
                let label = if self.image_busy {
                    "AI 正在绘图中..."
                } else {
                    "立即生成图片"
                };
                let can_generate = !self.image_busy && !self.image_prompt.trim().is_empty();
                let button = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                    .fill(colors.ui.accent)
                    .min_size(Vec2::new(200.0, 34.0));
                if ui.add_enabled(can_generate, button).clicked() {
                    output.generate_image =
                        Some((self.image_prompt.trim().to_string(), self.image_size));
                }

                ui.add_space(12.0);
                ui.label(
                    RichText::new("推荐使用 Gemini 或 DALL·E 3 模型。\n描述越详细，效果越好。支持中文描述。")
                        .size(11.0)
                        .color(colors.text.muted),
                );
            });

            ui.separator();

            // Preview
            ui.vertical(|ui| {
                let preview_size = Vec2::new(340.0, 300.0);
                let (rect, _) = ui.allocate_exact_size(preview_size, egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, 4.0, colors.base.background_secondary);

                if self.image_busy {
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "正在精心绘制...",
                        egui::FontId::proportional(13.0),
                        colors.text.muted,
                    );
                } else if let Some(url) = self.image_url.clone() {
                    match image_texture(ui, &url) {
                        Some(texture) => {
                            let scale = fit_scale(texture.size_vec2(), preview_size);
                            let draw_size = texture.size_vec2() * scale;
                            let image_rect =
                                egui::Rect::from_center_size(rect.center(), draw_size);
                            egui::Image::from_texture(&texture)
                                .fit_to_exact_size(draw_size)
                                .paint_at(ui, image_rect);
                        }
                        None => {
                            // Remote URL; only decoded data URLs preview inline
                            ui.painter().text(
                                rect.center(),
                                egui::Align2::CENTER_CENTER,
                                "图片已生成，点击下方按钮查看",
                                egui::FontId::proportional(12.0),
                                colors.text.secondary,
                            );
                        }
                    }

                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        let insert =
                            egui::Button::new(RichText::new("插入到文章").color(Color32::WHITE))
                                .fill(colors.ui.accent);
                        if ui.add(insert).clicked() {
                            output.insert_image = Some(url.clone());
                            output.close_requested = true;
                        }
                        if ui.button("查看原图").clicked() {
                            output.open_image = Some(url);
                        }
                    });
                } else {
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "在此处预览 AI 生成的图片",
                        egui::FontId::proportional(12.0),
                        colors.text.muted,
                    );
                }
            });
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Image Preview
// ─────────────────────────────────────────────────────────────────────────────

/// Decode and cache a generated `data:` URL as an egui texture.
fn image_texture(ui: &Ui, src: &str) -> Option<TextureHandle> {
    use base64::Engine as _;

    let key = egui::Id::new(("ai-image", src));
    if let Some(texture) = ui.ctx().data(|d| d.get_temp::<TextureHandle>(key)) {
        return Some(texture);
    }

    let (_, payload) = src.split_once(";base64,")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()?;
    let decoded = image::load_from_memory(&bytes).ok()?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    let texture = ui
        .ctx()
        .load_texture("ai-image", color_image, egui::TextureOptions::LINEAR);
    ui.ctx().data_mut(|d| d.insert_temp(key, texture.clone()));
    Some(texture)
}

/// Uniform scale that fits `size` inside `bounds` without upscaling.
fn fit_scale(size: Vec2, bounds: Vec2) -> f32 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return 1.0;
    }
    (bounds.x / size.x).min(bounds.y / size.y).min(1.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_prefills_chat_input() {
        let modal = AiModal::new("这段 文字", None);
        assert_eq!(modal.chat_input, "请帮我优化这段文字：\n\"这段 文字\"");

        let modal = AiModal::new("   ", None);
        assert!(modal.chat_input.is_empty());
    }

    #[test]
    fn test_last_image_seeds_preview() {
        let modal = AiModal::new("", Some("data:image/png;base64,AA=="));
        assert_eq!(modal.image_url.as_deref(), Some("data:image/png;base64,AA=="));
    }

    #[test]
    fn test_preset_prompt_prefers_selection() {
        let prompt = AiModal::preset_prompt("润色文章", "一段话", "全文").unwrap();
        assert_eq!(prompt, "润色文章：\n\"一段话\"");
    }

    #[test]
    fn test_preset_prompt_falls_back_to_short_article() {
        let prompt = AiModal::preset_prompt("提取要点", "", "短文章").unwrap();
        assert_eq!(prompt, "提取要点，针对以下全文：\n\"短文章\"");
    }

    #[test]
    fn test_preset_prompt_rejects_long_article_without_selection() {
        let long = "字".repeat(PRESET_FULL_TEXT_LIMIT);
        let err = AiModal::preset_prompt("润色文章", "", &long).unwrap_err();
        assert_eq!(err, SELECT_TEXT_FIRST);
    }

    #[test]
    fn test_layout_result_kept_until_applied() {
        let mut modal = AiModal::new("", None);
        modal.layout_started();
        assert!(modal.layout_busy);

        modal.layout_finished(Err(String::from("超时")));
        assert!(!modal.layout_busy);
        assert!(modal.layout_result.is_none());

        modal.layout_finished(Ok(String::from("# 整理后的文章")));
        assert_eq!(modal.layout_result.as_deref(), Some("# 整理后的文章"));
    }

    #[test]
    fn test_image_finished_updates_preview() {
        let mut modal = AiModal::new("", None);
        modal.image_started();
        modal.image_finished(Err(String::from("网络错误")));
        assert!(!modal.image_busy);
        assert!(modal.image_url.is_none());

        modal.image_finished(Ok(String::from("https://example.com/a.png")));
        assert_eq!(modal.image_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn test_fit_scale_never_upscales() {
        assert_eq!(fit_scale(Vec2::new(100.0, 100.0), Vec2::new(300.0, 300.0)), 1.0);
        let scale = fit_scale(Vec2::new(1024.0, 1024.0), Vec2::new(340.0, 300.0));
        assert!((scale - 300.0 / 1024.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_output_default_is_inert() {
        let output = AiModalOutput::default();
        assert!(!output.close_requested);
        assert!(output.send_chat.is_none());
        assert!(!output.start_layout);
        assert!(output.generate_image.is_none());
    }

    #[test]
    fn test_modal_renders_headless() {
        let ctx = egui::Context::default();
        let mut modal = AiModal::new("", None);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let output = modal.show(ctx, &[], "", "# 文章", &ThemeColors::light());
            assert!(!output.close_requested);
        });
    }
}
