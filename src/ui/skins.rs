//! Skin library modal for PixelMark (主题样式库)
//!
//! Lists the stock and custom skins with favorite stars, apply buttons and
//! an expandable CSS view. Custom skins can be renamed, edited and deleted;
//! a prompt panel generates new skins through the AI worker. All catalog
//! mutations are reported through the output and applied by the caller, so
//! the modal never owns the library.

use eframe::egui::{self, Color32, RichText, Ui, Vec2};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::skin::{Skin, SkinLibrary};
use crate::theme::ThemeColors;
use crate::ui::dialogs::modal_overlay;

/// Favorite star tint.
const STAR_COLOR: Color32 = Color32::from_rgb(250, 204, 21);

/// Result of showing the skin library modal.
#[derive(Debug, Clone, Default)]
pub struct SkinsModalOutput {
    /// Whether the modal should be closed
    pub close_requested: bool,
    /// Skin id to make active
    pub apply: Option<String>,
    /// Skin id whose favorite flag flips
    pub toggle_favorite: Option<String>,
    /// Custom skin id to delete (needs confirmation)
    pub delete: Option<String>,
    /// Custom skin rename: (id, new name)
    pub rename: Option<(String, String)>,
    /// Custom skin CSS edit: (id, new css)
    pub set_css: Option<(String, String)>,
    /// Prompt for AI skin generation
    pub generate: Option<String>,
    /// CSS was copied to the clipboard
    pub copied_css: bool,
}

/// Skin library modal state.
pub struct SkinsModal {
    search: String,
    matcher: SkimMatcherV2,
    show_ai_panel: bool,
    ai_prompt: String,
    generating: bool,
    generate_error: Option<String>,
    /// Skin whose CSS section is expanded
    expanded_id: Option<String>,
    /// Working CSS text while a custom skin is expanded
    css_buffer: String,
    /// Working name while a custom skin is expanded
    rename_buffer: String,
}

impl Default for SkinsModal {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinsModal {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            matcher: SkimMatcherV2::default(),
            show_ai_panel: false,
            ai_prompt: String::new(),
            generating: false,
            generate_error: None,
            expanded_id: None,
            css_buffer: String::new(),
            rename_buffer: String::new(),
        }
    }

    /// Feed back the result of an AI generation request. Success closes the
    /// prompt panel; failure keeps it open with the error shown inline.
    pub fn generation_finished(&mut self, result: Result<(), String>) {
        self.generating = false;
        match result {
            Ok(()) => {
                self.show_ai_panel = false;
                self.ai_prompt.clear();
                self.generate_error = None;
            }
            Err(message) => self.generate_error = Some(message),
        }
    }

    /// Skins in display order, filtered by the search box.
    fn filtered<'a>(&self, library: &'a SkinLibrary) -> Vec<&'a Skin> {
        let query = self.search.trim();
        library
            .sorted()
            .into_iter()
            .filter(|skin| {
                query.is_empty() || self.matcher.fuzzy_match(&skin.name, query).is_some()
            })
            .collect()
    }

    /// Show the modal. `active_id` is the currently applied skin.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        library: &SkinLibrary,
        active_id: &str,
        colors: &ThemeColors,
    ) -> SkinsModalOutput {
        let mut output = SkinsModalOutput::default();

        if modal_overlay(ctx, "skins_overlay", colors.is_dark()) {
            output.close_requested = true;
        }

        egui::Window::new("主题样式库")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(520.0)
            .max_width(560.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!(
                            "内置 {} 款 / 自定义 {} 款",
                            library.built_in_count(),
                            library.custom_count()
                        ))
                        .size(12.0)
                        .color(colors.text.muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let toggle = ui.add(
                            egui::Button::new(
                                RichText::new("✨ AI生成新主题").size(12.0).color(Color32::WHITE),
                            )
                            .fill(colors.ui.accent)
                            .min_size(Vec2::new(0.0, 24.0)),
                        );
                        if toggle.clicked() {
                            self.show_ai_panel = !self.show_ai_panel;
                        }
                    });
                });

                if self.show_ai_panel {
                    ui.add_space(6.0);
                    self.show_ai_panel_contents(ui, colors, &mut output);
                }

                ui.add_space(6.0);
                ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("搜索主题...")
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);
                ui.separator();

                let skins = self.filtered(library);
                egui::ScrollArea::vertical()
                    .id_source("skins_list")
                    .max_height(380.0)
                    .show(ui, |ui| {
                        ui.set_min_width(500.0);
                        for skin in skins {
                            self.show_skin_row(ui, skin, active_id, colors, &mut output);
                        }
                    });
            });

        output
    }

    fn show_ai_panel_contents(
        &mut self,
        ui: &mut Ui,
        colors: &ThemeColors,
        output: &mut SkinsModalOutput,
    ) {
        egui::Frame::none()
            .fill(colors.base.background_secondary)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(egui::Margin::same(10.0))
            .show(ui, |ui| {
                ui.label(RichText::new("描述主题风格").size(12.0).strong());
                ui.add_space(4.0);
                ui.add(
                    egui::TextEdit::multiline(&mut self.ai_prompt)
                        .hint_text("例如: 赛博朋克风, 极简黑白, 适合科技类文章...")
                        .desired_rows(2)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    let can_generate = !self.generating && !self.ai_prompt.trim().is_empty();
                    let label = if self.generating { "生成中..." } else { "生成" };
                    let button = ui.add_enabled(
                        can_generate,
                        egui::Button::new(RichText::new(label).color(Color32::WHITE))
                            .fill(colors.ui.accent)
                            .min_size(Vec2::new(64.0, 24.0)),
                    );
                    if button.clicked() {
                        self.generating = true;
                        self.generate_error = None;
                        output.generate = Some(self.ai_prompt.trim().to_string());
                    }

                    ui.label(
                        RichText::new("AI将自动生成CSS代码并应用到列表中")
                            .size(11.0)
                            .color(colors.text.muted),
                    );
                });

                if let Some(message) = &self.generate_error {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!("生成失败: {}", message))
                            .size(12.0)
                            .color(colors.ui.error),
                    );
                }
            });
    }

    fn show_skin_row(
        &mut self,
        ui: &mut Ui,
        skin: &Skin,
        active_id: &str,
        colors: &ThemeColors,
        output: &mut SkinsModalOutput,
    ) {
        let is_active = skin.id == active_id;
        let expanded = self.expanded_id.as_deref() == Some(skin.id.as_str());

        ui.push_id(&skin.id, |ui| {
            ui.horizontal(|ui| {
                let (star, star_color) = if skin.favorite {
                    ("★", STAR_COLOR)
                } else {
                    ("☆", colors.text.muted)
                };
                let star_btn = ui.add(
                    egui::Button::new(RichText::new(star).size(15.0).color(star_color))
                        .frame(false),
                );
                if star_btn.clicked() {
                    output.toggle_favorite = Some(skin.id.clone());
                }

                ui.label(RichText::new(&skin.name).size(13.0).color(colors.text.primary));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if !skin.built_in
                        && ui
                            .add(egui::Button::new(
                                RichText::new("删除").size(12.0).color(colors.ui.error),
                            ))
                            .clicked()
                    {
                        output.delete = Some(skin.id.clone());
                    }

                    let toggle_label = if expanded { "收起" } else { "查看 CSS" };
                    if ui.small_button(toggle_label).clicked() {
                        if expanded {
                            self.expanded_id = None;
                        } else {
                            self.expanded_id = Some(skin.id.clone());
                            self.css_buffer = skin.css.clone();
                            self.rename_buffer = skin.name.clone();
                        }
                    }

                    if is_active {
                        ui.label(
                            RichText::new("已应用").size(12.0).strong().color(colors.ui.accent),
                        );
                    } else if ui.small_button("应用").clicked() {
                        output.apply = Some(skin.id.clone());
                    }
                });
            });

            if expanded {
                self.show_css_section(ui, skin, colors, output);
            }

            ui.add_space(2.0);
            ui.separator();
        });
    }

    fn show_css_section(
        &mut self,
        ui: &mut Ui,
        skin: &Skin,
        colors: &ThemeColors,
        output: &mut SkinsModalOutput,
    ) {
        egui::Frame::none()
            .fill(colors.base.background_tertiary)
            .rounding(egui::Rounding::same(4.0))
            .inner_margin(egui::Margin::same(8.0))
            .show(ui, |ui| {
                if skin.built_in {
                    // Stock CSS is read-only
                    egui::ScrollArea::vertical()
                        .id_source("skin_css_view")
                        .max_height(160.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new(&skin.css).monospace().size(11.0));
                        });
                } else {
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut self.rename_buffer)
                                .desired_width(180.0),
                        );
                        let name = self.rename_buffer.trim();
                        if ui
                            .add_enabled(!name.is_empty(), egui::Button::new("重命名"))
                            .clicked()
                        {
                            output.rename = Some((skin.id.clone(), name.to_string()));
                        }
                    });
                    ui.add_space(4.0);
                    ui.add(
                        egui::TextEdit::multiline(&mut self.css_buffer)
                            .code_editor()
                            .desired_rows(8)
                            .desired_width(f32::INFINITY),
                    );
                }

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui.small_button("复制").clicked() {
                        ui.output_mut(|o| o.copied_text = skin.css.clone());
                        output.copied_css = true;
                    }
                    if !skin.built_in && ui.small_button("保存修改").clicked() {
                        output.set_css = Some((skin.id.clone(), self.css_buffer.clone()));
                    }
                });
            });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_modal_state() {
        let modal = SkinsModal::new();
        assert!(!modal.show_ai_panel);
        assert!(!modal.generating);
        assert!(modal.expanded_id.is_none());
        assert!(modal.generate_error.is_none());
    }

    #[test]
    fn test_generation_success_closes_panel() {
        let mut modal = SkinsModal::new();
        modal.show_ai_panel = true;
        modal.ai_prompt = String::from("赛博朋克风");
        modal.generating = true;

        modal.generation_finished(Ok(()));
        assert!(!modal.generating);
        assert!(!modal.show_ai_panel);
        assert!(modal.ai_prompt.is_empty());
    }

    #[test]
    fn test_generation_failure_keeps_panel_with_error() {
        let mut modal = SkinsModal::new();
        modal.show_ai_panel = true;
        modal.ai_prompt = String::from("极简黑白");
        modal.generating = true;

        modal.generation_finished(Err(String::from("超时")));
        assert!(!modal.generating);
        assert!(modal.show_ai_panel);
        assert_eq!(modal.ai_prompt, "极简黑白");
        assert_eq!(modal.generate_error.as_deref(), Some("超时"));
    }

    #[test]
    fn test_filter_matches_names() {
        let mut modal = SkinsModal::new();
        let library = SkinLibrary::new();

        // Blank search shows everything
        assert_eq!(modal.filtered(&library).len(), library.built_in_count());

        modal.search = String::from("深色");
        let hits = modal.filtered(&library);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "dark");

        modal.search = String::from("不存在的主题");
        assert!(modal.filtered(&library).is_empty());
    }

    #[test]
    fn test_output_default_is_inert() {
        let output = SkinsModalOutput::default();
        assert!(!output.close_requested);
        assert!(output.apply.is_none());
        assert!(output.delete.is_none());
        assert!(output.generate.is_none());
        assert!(!output.copied_css);
    }

    #[test]
    fn test_modal_renders_headless() {
        let ctx = egui::Context::default();
        let mut modal = SkinsModal::new();
        let library = SkinLibrary::new();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let output = modal.show(ctx, &library, "pixel", &ThemeColors::light());
            assert!(!output.close_requested);
            assert!(output.apply.is_none());
        });
    }
}
