//! Snippet library modal for PixelMark (文案片段库)
//!
//! Category chips, fuzzy search, one-click insertion into the article, and
//! a small inline form for creating or editing snippets. Library mutations
//! are reported through the output; the caller owns the snippet list.

use eframe::egui::{self, Color32, RichText, Ui, Vec2};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::snippets::{Snippet, SnippetLibrary, DEFAULT_CATEGORY};
use crate::theme::ThemeColors;
use crate::ui::dialogs::modal_overlay;

/// Result of showing the snippet modal.
#[derive(Debug, Clone, Default)]
pub struct SnippetsModalOutput {
    /// Whether the modal should be closed
    pub close_requested: bool,
    /// Snippet content to insert into the article
    pub insert: Option<String>,
    /// New snippet: (title, category, content)
    pub add: Option<(String, String, String)>,
    /// Edited snippet: (id, title, category, content)
    pub update: Option<(String, String, String, String)>,
    /// Snippet id to delete (needs confirmation)
    pub delete: Option<String>,
}

/// Working copy of the snippet being created or edited.
struct SnippetForm {
    /// `None` while creating a new snippet
    id: Option<String>,
    title: String,
    category: String,
    content: String,
}

impl SnippetForm {
    fn blank() -> Self {
        Self {
            id: None,
            title: String::new(),
            category: String::new(),
            content: String::new(),
        }
    }

    fn editing(snippet: &Snippet) -> Self {
        Self {
            id: Some(snippet.id.clone()),
            title: snippet.title.clone(),
            category: snippet.category.clone(),
            content: snippet.content.clone(),
        }
    }
}

/// Snippet library modal state.
pub struct SnippetsModal {
    search: String,
    matcher: SkimMatcherV2,
    /// `None` shows every category
    active_category: Option<String>,
    /// Open create/edit form
    form: Option<SnippetForm>,
}

impl Default for SnippetsModal {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetsModal {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            matcher: SkimMatcherV2::default(),
            active_category: None,
            form: None,
        }
    }

    /// Snippets passing the category chip and the search box.
    fn visible<'a>(&self, library: &'a SnippetLibrary) -> Vec<&'a Snippet> {
        let query = self.search.trim();
        library
            .filtered(self.active_category.as_deref())
            .into_iter()
            .filter(|snippet| {
                query.is_empty()
                    || self.matcher.fuzzy_match(&snippet.title, query).is_some()
                    || self.matcher.fuzzy_match(&snippet.content, query).is_some()
            })
            .collect()
    }

    /// Show the modal.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        library: &SnippetLibrary,
        colors: &ThemeColors,
    ) -> SnippetsModalOutput {
        let mut output = SnippetsModalOutput::default();

        if modal_overlay(ctx, "snippets_overlay", colors.is_dark()) {
            output.close_requested = true;
        }

        egui::Window::new("文案片段库")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(480.0)
            .max_width(520.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.search)
                            .hint_text("搜索片段...")
                            .desired_width(220.0),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let new_btn = ui.add(
                            egui::Button::new(
                                RichText::new("+ 新建片段").size(12.0).color(Color32::WHITE),
                            )
                            .fill(colors.ui.accent)
                            .min_size(Vec2::new(0.0, 24.0)),
                        );
                        if new_btn.clicked() {
                            self.form = Some(SnippetForm::blank());
                        }
                    });
                });

                ui.add_space(6.0);

                // Category chips
                ui.horizontal_wrapped(|ui| {
                    if ui
                        .selectable_label(self.active_category.is_none(), "全部")
                        .clicked()
                    {
                        self.active_category = None;
                    }
                    for category in library.categories() {
                        let selected = self.active_category.as_deref() == Some(category);
                        if ui.selectable_label(selected, category).clicked() {
                            self.active_category = Some(category.to_string());
                        }
                    }
                });

                ui.add_space(6.0);

                if self.form.is_some() {
                    self.show_form(ui, colors, &mut output);
                    ui.add_space(6.0);
                }

                ui.separator();

                let snippets = self.visible(library);
                if snippets.is_empty() {
                    ui.add_space(12.0);
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("暂无匹配片段").size(12.0).color(colors.text.muted));
                    });
                    ui.add_space(12.0);
                } else {
                    egui::ScrollArea::vertical()
                        .id_source("snippets_list")
                        .max_height(360.0)
                        .show(ui, |ui| {
                            ui.set_min_width(460.0);
                            for snippet in snippets {
                                self.show_snippet_row(ui, snippet, colors, &mut output);
                            }
                        });
                }
            });

        output
    }

    fn show_form(&mut self, ui: &mut Ui, colors: &ThemeColors, output: &mut SnippetsModalOutput) {
        let mut close_form = false;

        if let Some(form) = &mut self.form {
            egui::Frame::none()
                .fill(colors.base.background_secondary)
                .rounding(egui::Rounding::same(6.0))
                .inner_margin(egui::Margin::same(10.0))
                .show(ui, |ui| {
                    let heading = if form.id.is_some() {
                        "编辑片段"
                    } else {
                        "新建片段"
                    };
                    ui.label(RichText::new(heading).size(13.0).strong());
                    ui.add_space(6.0);

                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut form.title)
                                .hint_text("标题")
                                .desired_width(200.0),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut form.category)
                                .hint_text(DEFAULT_CATEGORY)
                                .desired_width(120.0),
                        );
                    });
                    ui.add_space(4.0);
                    ui.add(
                        egui::TextEdit::multiline(&mut form.content)
                            .hint_text("片段内容 (Markdown)")
                            .desired_rows(4)
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(6.0);

                    ui.horizontal(|ui| {
                        let can_save =
                            !form.title.trim().is_empty() && !form.content.trim().is_empty();
                        if ui
                            .add_enabled(
                                can_save,
                                egui::Button::new(RichText::new("保存").color(Color32::WHITE))
                                    .fill(colors.ui.accent),
                            )
                            .clicked()
                        {
                            let title = form.title.trim().to_string();
                            let category = form.category.trim().to_string();
                            let content = form.content.clone();
                            match &form.id {
                                Some(id) => {
                                    output.update = Some((id.clone(), title, category, content));
                                }
                                None => output.add = Some((title, category, content)),
                            }
                            close_form = true;
                        }

                        if ui.button("取消").clicked() {
                            close_form = true;
                        }
                    });
                });
        }

        if close_form {
            self.form = None;
        }
    }

    fn show_snippet_row(
        &mut self,
        ui: &mut Ui,
        snippet: &Snippet,
        colors: &ThemeColors,
        output: &mut SnippetsModalOutput,
    ) {
        ui.push_id(&snippet.id, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(&snippet.title)
                                .size(13.0)
                                .strong()
                                .color(colors.text.primary),
                        );
                        ui.label(
                            RichText::new(&snippet.category)
                                .size(10.0)
                                .color(colors.text.muted),
                        );
                    });
                    ui.label(
                        RichText::new(preview_line(&snippet.content))
                            .size(11.0)
                            .color(colors.text.secondary),
                    );
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(egui::Button::new(
                            RichText::new("删除").size(12.0).color(colors.ui.error),
                        ))
                        .clicked()
                    {
                        output.delete = Some(snippet.id.clone());
                    }

                    if ui.small_button("编辑").clicked() {
                        self.form = Some(SnippetForm::editing(snippet));
                    }

                    if ui
                        .add(egui::Button::new(
                            RichText::new("插入").size(12.0).color(colors.ui.accent),
                        ))
                        .clicked()
                    {
                        output.insert = Some(snippet.content.clone());
                        output.close_requested = true;
                    }
                });
            });

            ui.add_space(2.0);
            ui.separator();
        });
    }
}

/// First non-blank line of the content, truncated for list display.
fn preview_line(content: &str) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    let mut preview: String = line.chars().take(30).collect();
    if line.chars().count() > 30 {
        preview.push('…');
    }
    preview
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_modal_state() {
        let modal = SnippetsModal::new();
        assert!(modal.search.is_empty());
        assert!(modal.active_category.is_none());
        assert!(modal.form.is_none());
    }

    #[test]
    fn test_visible_honors_category_and_search() {
        let mut modal = SnippetsModal::new();
        let library = SnippetLibrary::default();

        assert_eq!(modal.visible(&library).len(), 4);

        modal.active_category = Some(String::from("引导类"));
        assert_eq!(modal.visible(&library).len(), 2);

        modal.search = String::from("推荐");
        let hits = modal.visible(&library);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "往期推荐");

        // Search also matches content, not just titles
        modal.active_category = None;
        modal.search = String::from("投资建议");
        let hits = modal.visible(&library);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "免责声明");
    }

    #[test]
    fn test_form_prefills_for_editing() {
        let library = SnippetLibrary::default();
        let snippet = library.get("s_02").unwrap();
        let form = SnippetForm::editing(snippet);
        assert_eq!(form.id.as_deref(), Some("s_02"));
        assert_eq!(form.title, "免责声明");
        assert_eq!(form.category, "声明类");
    }

    #[test]
    fn test_preview_line() {
        assert_eq!(preview_line("\n\n> 引导语\n正文"), "> 引导语");
        assert_eq!(preview_line("   "), "");
        let long = "这是一个足够长需要截断的片段内容预览行文字文字文字文字文字文字";
        assert!(preview_line(long).ends_with('…'));
        assert_eq!(preview_line(long).chars().count(), 31);
    }

    #[test]
    fn test_output_default_is_inert() {
        let output = SnippetsModalOutput::default();
        assert!(!output.close_requested);
        assert!(output.insert.is_none());
        assert!(output.add.is_none());
        assert!(output.update.is_none());
        assert!(output.delete.is_none());
    }

    #[test]
    fn test_modal_renders_headless() {
        let ctx = egui::Context::default();
        let mut modal = SnippetsModal::new();
        let library = SnippetLibrary::default();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let output = modal.show(ctx, &library, &ThemeColors::light());
            assert!(!output.close_requested);
            assert!(output.insert.is_none());
        });
    }
}
