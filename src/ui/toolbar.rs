//! Top toolbar for PixelMark
//!
//! Brand mark, live word-count indicator and the feature entry points:
//! snippets, AI assistant, skin library, settings and the one-click
//! WeChat copy button.

use crate::editor::WordCount;
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the toolbar strip.
pub const TOOLBAR_HEIGHT: f32 = 44.0;

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Open the snippet library modal
    OpenSnippets,
    /// Open the AI assistant modal
    OpenAi,
    /// Open the skin library modal
    OpenSkins,
    /// Open the settings modal
    OpenSettings,
    /// Serialize the preview and copy it for the WeChat editor
    CopyToWechat,
}

/// Render the toolbar and return any triggered action.
///
/// `copy_in_flight` disables the copy button while a previous copy is
/// still being serialized.
pub fn show(
    ui: &mut Ui,
    word_count: &WordCount,
    copy_in_flight: bool,
    colors: &ThemeColors,
) -> Option<ToolbarAction> {
    let mut action: Option<ToolbarAction> = None;

    ui.painter().rect_filled(
        ui.available_rect_before_wrap(),
        0.0,
        colors.base.background_secondary,
    );

    ui.horizontal(|ui| {
        ui.set_height(TOOLBAR_HEIGHT);
        ui.spacing_mut().item_spacing.x = 4.0;

        ui.add_space(12.0);

        // Brand mark: pixel glyph in accent green plus the product name
        ui.label(
            RichText::new("▩")
                .size(20.0)
                .color(colors.ui.accent),
        );
        ui.label(
            RichText::new("微信公众号编辑器")
                .size(15.0)
                .strong()
                .color(colors.text.primary),
        );

        ui.add_space(16.0);

        // Live word count, switching to the overrun warning past the limit
        let total = word_count.total();
        let (count_label, count_color) = if word_count.over_limit() {
            (format!("字数超标: {}", total), colors.ui.error)
        } else {
            (format!("实时字数: {}", total), colors.text.muted)
        };
        ui.label(RichText::new(count_label).size(12.0).color(count_color));

        // Feature buttons, right-aligned. Emitted in reverse so the visual
        // order reads 文案片段 | AI 助手 | 主题库 | 设置 | 一键复制.
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(12.0);

            if copy_button(ui, copy_in_flight, colors).clicked() {
                action = Some(ToolbarAction::CopyToWechat);
            }

            ui.add_space(8.0);

            if toolbar_button(ui, "⚙", "设置", colors).clicked() {
                action = Some(ToolbarAction::OpenSettings);
            }

            if toolbar_button(ui, "🎨", "主题库", colors).clicked() {
                action = Some(ToolbarAction::OpenSkins);
            }

            if toolbar_button(ui, "✨", "AI 助手", colors).clicked() {
                action = Some(ToolbarAction::OpenAi);
            }

            if toolbar_button(ui, "📋", "文案片段", colors).clicked() {
                action = Some(ToolbarAction::OpenSnippets);
            }
        });
    });

    // Bottom border
    let rect = ui.min_rect();
    ui.painter().line_segment(
        [
            egui::pos2(rect.min.x, rect.max.y),
            egui::pos2(rect.max.x, rect.max.y),
        ],
        egui::Stroke::new(1.0, colors.base.border_subtle),
    );

    action
}

/// Render a labeled toolbar button with an icon prefix.
fn toolbar_button(ui: &mut Ui, icon: &str, label: &str, colors: &ThemeColors) -> Response {
    let text = format!("{} {}", icon, label);
    let btn = ui.add(
        egui::Button::new(
            RichText::new(text)
                .size(13.0)
                .color(colors.text.secondary),
        )
        .frame(false)
        .min_size(Vec2::new(0.0, 30.0)),
    );

    if btn.hovered() {
        ui.painter().rect_filled(
            btn.rect.expand2(Vec2::new(6.0, 0.0)),
            egui::Rounding::same(4.0),
            colors.base.hover,
        );
        ui.painter().text(
            btn.rect.center(),
            egui::Align2::CENTER_CENTER,
            format!("{} {}", icon, label),
            egui::FontId::proportional(13.0),
            colors.text.primary,
        );
    }

    btn
}

/// Render the accent-filled WeChat copy button.
fn copy_button(ui: &mut Ui, copy_in_flight: bool, colors: &ThemeColors) -> Response {
    let label = if copy_in_flight {
        "复制中..."
    } else {
        "一键复制"
    };

    let fill = if copy_in_flight {
        colors.text.disabled
    } else {
        colors.ui.accent
    };

    let btn = ui.add_enabled(
        !copy_in_flight,
        egui::Button::new(
            RichText::new(label)
                .size(13.0)
                .strong()
                .color(Color32::WHITE),
        )
        .fill(fill)
        .rounding(egui::Rounding::same(5.0))
        .min_size(Vec2::new(92.0, 32.0)),
    );

    if btn.hovered() && !copy_in_flight {
        ui.painter().rect_filled(
            btn.rect,
            egui::Rounding::same(5.0),
            colors.ui.accent_hover,
        );
        ui.painter().text(
            btn.rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(13.0),
            Color32::WHITE,
        );
    }

    btn.on_hover_text("快捷键: Ctrl+Shift+C")
}
