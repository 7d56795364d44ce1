//! Markdown source editor pane
//!
//! Wraps egui's TextEdit with the article-editing chrome: an optional line
//! number gutter, a floating formatting toolbar over the selection, syntax
//! warning chips, Tab-to-spaces indentation and a right-click menu that
//! inserts snippets at the caret. The pane reports its scroll geometry so
//! the app can keep the preview in step.

use std::sync::Arc;

use eframe::egui::{self, Color32, FontId, RichText, ScrollArea, TextEdit, Ui, Vec2};
use log::debug;

use crate::editor::formatting::{apply_format, FormatCommand};
use crate::editor::syntax_check::SyntaxIssue;
use crate::editor::toolbar::{toolbar_position, GalleyMeasurer, ToolbarPosition};
use crate::snippets::Snippet;
use crate::string_utils::{byte_index_to_char_index, char_index_to_byte_index};
use crate::theme::ThemeColors;

/// Stable id of the article editor, shared with the shortcut handling in
/// the app so deferred commands can update the stored cursor.
pub fn editor_id() -> egui::Id {
    egui::Id::new("markdown_editor")
}

/// Result of showing the editor pane.
#[derive(Debug, Clone, Default)]
pub struct EditorOutput {
    /// Whether the content was modified this frame
    pub changed: bool,
    /// Current selection as byte offsets, start <= end, `None` when collapsed
    pub selection: Option<(usize, usize)>,
    /// Caret byte offset, present once the editor holds cursor state.
    /// Unlike `selection` this survives a collapsed cursor.
    pub caret: Option<usize>,
    /// Vertical scroll offset in points
    pub scroll_offset: f32,
    /// Total laid-out content height
    pub content_height: f32,
    /// Visible viewport height
    pub viewport_height: f32,
    /// The context menu asked for the snippet library modal
    pub open_snippet_library: bool,
}

/// The markdown editor widget.
///
/// ```ignore
/// let output = EditorPane::new(&mut content)
///     .font_size(settings.editor.font_size)
///     .show_line_numbers(settings.editor.show_line_numbers)
///     .tab_size(settings.editor.tab_size)
///     .issues(&issues)
///     .snippets(library.context_menu_entries())
///     .show(ui, &colors);
/// ```
pub struct EditorPane<'a> {
    content: &'a mut String,
    font_size: f32,
    tab_size: u8,
    show_line_numbers: bool,
    paste_plain_text: bool,
    issues: &'a [SyntaxIssue],
    snippets: &'a [Snippet],
    /// Scroll offset to force this frame (sync from the preview pane)
    sync_scroll_offset: Option<f32>,
}

impl<'a> EditorPane<'a> {
    pub fn new(content: &'a mut String) -> Self {
        Self {
            content,
            font_size: 14.0,
            tab_size: 2,
            show_line_numbers: true,
            paste_plain_text: false,
            issues: &[],
            snippets: &[],
            sync_scroll_offset: None,
        }
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn tab_size(mut self, size: u8) -> Self {
        self.tab_size = size.max(1);
        self
    }

    #[must_use]
    pub fn show_line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }

    /// egui pastes plain text by nature; this only controls the little mode
    /// indicator in the corner.
    #[must_use]
    pub fn paste_plain_text(mut self, enabled: bool) -> Self {
        self.paste_plain_text = enabled;
        self
    }

    #[must_use]
    pub fn issues(mut self, issues: &'a [SyntaxIssue]) -> Self {
        self.issues = issues;
        self
    }

    /// Snippets offered in the right-click menu.
    #[must_use]
    pub fn snippets(mut self, snippets: &'a [Snippet]) -> Self {
        self.snippets = snippets;
        self
    }

    #[must_use]
    pub fn sync_scroll_offset(mut self, offset: Option<f32>) -> Self {
        self.sync_scroll_offset = offset;
        self
    }

    /// Show the editor pane.
    pub fn show(self, ui: &mut Ui, colors: &ThemeColors) -> EditorOutput {
        let id = editor_id();
        let font_size = self.font_size;
        let font_id = FontId::monospace(font_size);
        let show_line_numbers = self.show_line_numbers;
        let content = self.content;
        let mut output = EditorOutput::default();

        // Tab inserts spaces instead of moving focus. Consumed before the
        // TextEdit sees the key, then applied after layout below.
        let editor_focused = ui.ctx().memory(|m| m.has_focus(id));
        let indent_requested = editor_focused
            && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Tab));

        let gutter_width = if show_line_numbers {
            gutter_width_for(count_lines(content), font_size)
        } else {
            0.0
        };

        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let job = egui::text::LayoutJob::simple(
                text.to_owned(),
                FontId::monospace(font_size),
                ui.visuals().text_color(),
                wrap_width,
            );
            ui.fonts(|f| f.layout_job(job))
        };

        let mut scroll_area = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false]);
        if let Some(offset) = self.sync_scroll_offset {
            scroll_area = scroll_area.vertical_scroll_offset(offset.max(0.0));
        }

        let scroll_output = scroll_area.show(ui, |ui| {
            ui.horizontal_top(|ui| {
                // The gutter scrolls with the content; numbers are painted
                // against the galley rows once layout is known.
                let gutter_rect = if show_line_numbers {
                    let line_height = ui.fonts(|f| f.row_height(&font_id));
                    let total_height = count_lines(content) as f32 * line_height;
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(gutter_width, total_height.max(ui.available_height())),
                        egui::Sense::hover(),
                    );
                    Some(rect)
                } else {
                    None
                };

                let text_output = TextEdit::multiline(content)
                    .id(id)
                    .frame(false)
                    .font(font_id.clone())
                    .desired_width(f32::INFINITY)
                    .lock_focus(true)
                    .layouter(&mut layouter)
                    .show(ui);

                if let Some(gutter_rect) = gutter_rect {
                    paint_line_numbers(
                        ui,
                        gutter_rect,
                        &text_output.galley,
                        text_output.galley_pos,
                        font_size,
                        colors,
                    );
                }

                text_output
            })
            .inner
        });

        let text_output = scroll_output.inner;
        output.changed = text_output.response.changed();
        output.scroll_offset = scroll_output.state.offset.y;
        output.content_height = scroll_output.content_size.y;
        output.viewport_height = scroll_output.inner_rect.height();

        // Selection, both in chars (for the galley) and bytes (for edits)
        let char_selection = text_output.cursor_range.and_then(|range| {
            let a = range.primary.ccursor.index;
            let b = range.secondary.ccursor.index;
            if a == b {
                None
            } else {
                Some((a.min(b), a.max(b)))
            }
        });
        let byte_selection = char_selection.map(|(start, end)| {
            (
                char_index_to_byte_index(content, start),
                char_index_to_byte_index(content, end),
            )
        });
        output.selection = byte_selection;

        // Caret position for insertions, collapsed selections included
        let primary_char = text_output.cursor_range.map(|range| range.primary.ccursor.index);
        output.caret = primary_char.map(|index| char_index_to_byte_index(content, index));
        let caret_char = primary_char.unwrap_or_else(|| content.chars().count());

        // Floating formatting toolbar over the selection
        let mut pending_format: Option<FormatCommand> = None;
        if let Some(pos) = toolbar_position(
            char_selection,
            &GalleyMeasurer::new(&text_output.galley),
            (scroll_output.state.offset.y, scroll_output.state.offset.x),
        ) {
            // toolbar_position works in galley coordinates; shift by the
            // galley's static origin inside the viewport before clamping.
            let margin =
                (text_output.galley_pos - scroll_output.inner_rect.min) + scroll_output.state.offset;
            let viewport_pos = ToolbarPosition {
                top: pos.top + margin.y,
                left: pos.left + margin.x,
            }
            .clamped();
            let anchor = scroll_output.inner_rect.min
                + egui::vec2(viewport_pos.left, viewport_pos.top);

            egui::Area::new(id.with("format_toolbar"))
                .fixed_pos(anchor)
                .order(egui::Order::Foreground)
                .show(ui.ctx(), |ui| {
                    egui::Frame::none()
                        .fill(Color32::from_rgb(31, 41, 55))
                        .rounding(egui::Rounding::same(4.0))
                        .inner_margin(egui::Margin::symmetric(4.0, 3.0))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                for command in FormatCommand::all() {
                                    let button = egui::Button::new(
                                        RichText::new(command.label())
                                            .size(12.0)
                                            .color(Color32::WHITE),
                                    )
                                    .frame(false)
                                    .min_size(Vec2::new(24.0, 20.0));
                                    if ui.add(button).on_hover_text(command.tooltip()).clicked() {
                                        pending_format = Some(command);
                                    }
                                }
                            });
                        });
                });
        }

        if let (Some(command), Some(selection)) = (pending_format, byte_selection) {
            apply_command(ui.ctx(), content, selection, command);
            output.changed = true;
        }

        if indent_requested {
            let range = char_selection.unwrap_or((caret_char, caret_char));
            replace_char_range(ui.ctx(), content, range, &" ".repeat(self.tab_size as usize));
            output.changed = true;
        }

        // Right-click menu: quick snippets plus the library shortcut
        let mut picked_snippet: Option<String> = None;
        text_output.response.context_menu(|ui| {
            ui.label(
                RichText::new("常用片段")
                    .size(11.0)
                    .strong()
                    .color(colors.text.muted),
            );
            for snippet in self.snippets {
                if ui.button(&snippet.title).clicked() {
                    picked_snippet = Some(snippet.content.clone());
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui.button("管理片段库...").clicked() {
                output.open_snippet_library = true;
                ui.close_menu();
            }
        });
        if let Some(text) = picked_snippet {
            replace_char_range(ui.ctx(), content, (caret_char, caret_char), &text);
            output.changed = true;
            debug!("Inserted snippet at char {}", caret_char);
        }

        paint_issue_chips(ui, scroll_output.inner_rect, self.issues, colors);
        if self.paste_plain_text {
            paint_paste_indicator(ui, scroll_output.inner_rect, colors);
        }

        output
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Edit Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Apply a formatting command to the byte selection and keep the wrapped
/// text selected; a collapsed selection gets the marker pair with the
/// caret parked between. Used by both the floating toolbar and the
/// keyboard shortcuts. Returns the new byte selection.
pub fn apply_command(
    ctx: &egui::Context,
    content: &mut String,
    selection: (usize, usize),
    command: FormatCommand,
) -> (usize, usize) {
    let result = apply_format(content, selection, command);
    *content = result.text;

    let start = byte_index_to_char_index(content, result.selection.0);
    let end = byte_index_to_char_index(content, result.selection.1);
    set_cursor_chars(ctx, start, end);
    result.selection
}

/// Replace a char range with `replacement` and park the caret after it.
fn replace_char_range(
    ctx: &egui::Context,
    content: &mut String,
    range: (usize, usize),
    replacement: &str,
) {
    let start_byte = char_index_to_byte_index(content, range.0);
    let end_byte = char_index_to_byte_index(content, range.1);
    content.replace_range(start_byte..end_byte, replacement);

    let caret = range.0 + replacement.chars().count();
    set_cursor_chars(ctx, caret, caret);
}

/// Write a char-index cursor range into the editor's stored state and put
/// focus back on it. Does nothing before the editor has rendered once.
fn set_cursor_chars(ctx: &egui::Context, start: usize, end: usize) {
    let id = editor_id();
    if let Some(mut state) = TextEdit::load_state(ctx, id) {
        state
            .cursor
            .set_char_range(Some(egui::text::CCursorRange::two(
                egui::text::CCursor::new(start),
                egui::text::CCursor::new(end),
            )));
        state.store(ctx, id);
    }
    ctx.memory_mut(|m| m.request_focus(id));
}

// ─────────────────────────────────────────────────────────────────────────────
// Painting
// ─────────────────────────────────────────────────────────────────────────────

fn paint_line_numbers(
    ui: &Ui,
    gutter_rect: egui::Rect,
    galley: &egui::Galley,
    galley_pos: egui::Pos2,
    font_size: f32,
    colors: &ThemeColors,
) {
    let painter = ui.painter();
    painter.rect_filled(gutter_rect, 0.0, colors.base.background_secondary);
    painter.line_segment(
        [
            gutter_rect.right_top() + egui::vec2(-1.0, 0.0),
            gutter_rect.right_bottom() + egui::vec2(-1.0, 0.0),
        ],
        egui::Stroke::new(1.0, colors.base.border_subtle),
    );

    let number_font = FontId::monospace(font_size);

    // With word wrap a logical line spans several rows; number only the
    // first row of each line.
    let mut logical_line = 0usize;
    let mut numbered = false;
    for row in galley.rows.iter() {
        if !numbered {
            painter.text(
                egui::pos2(gutter_rect.right() - 12.0, galley_pos.y + row.min_y()),
                egui::Align2::RIGHT_TOP,
                format!("{}", logical_line + 1),
                number_font.clone(),
                colors.text.muted,
            );
            numbered = true;
        }
        if row.ends_with_newline {
            logical_line += 1;
            numbered = false;
        }
    }

    if galley.rows.is_empty() {
        painter.text(
            egui::pos2(gutter_rect.right() - 12.0, galley_pos.y),
            egui::Align2::RIGHT_TOP,
            "1",
            number_font,
            colors.text.muted,
        );
    }
}

/// Warning chips in the top-right corner of the viewport, one per issue.
fn paint_issue_chips(
    ui: &Ui,
    viewport: egui::Rect,
    issues: &[SyntaxIssue],
    colors: &ThemeColors,
) {
    let painter = ui.painter();
    let padding = egui::vec2(8.0, 4.0);
    let mut y = viewport.top() + 8.0;

    for issue in issues {
        let text = format!("第 {} 行: {}", issue.line, issue.message);
        let galley = painter.layout_no_wrap(text, FontId::proportional(11.0), colors.ui.error);
        let size = galley.size() + padding * 2.0;
        let rect = egui::Rect::from_min_size(
            egui::pos2(viewport.right() - size.x - 12.0, y),
            size,
        );
        painter.rect_filled(rect, 3.0, colors.ui.error.gamma_multiply(0.15));
        painter.galley(rect.min + padding, galley, colors.ui.error);
        y += size.y + 4.0;
    }
}

fn paint_paste_indicator(ui: &Ui, viewport: egui::Rect, colors: &ThemeColors) {
    let painter = ui.painter();
    let padding = egui::vec2(8.0, 3.0);
    let galley = painter.layout_no_wrap(
        String::from("纯文本粘贴模式开启"),
        FontId::proportional(10.0),
        colors.ui.warning,
    );
    let size = galley.size() + padding * 2.0;
    let rect = egui::Rect::from_min_size(
        egui::pos2(
            viewport.right() - size.x - 12.0,
            viewport.bottom() - size.y - 8.0,
        ),
        size,
    );
    painter.rect_filled(rect, 3.0, colors.ui.warning.gamma_multiply(0.15));
    painter.galley(rect.min + padding, galley, colors.ui.warning);
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Number of lines, at least 1 (empty content shows a single empty line).
fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        1
    } else {
        text.chars().filter(|&c| c == '\n').count() + 1
    }
}

/// Gutter width sized for the largest line number.
fn gutter_width_for(line_count: usize, font_size: f32) -> f32 {
    let digits = if line_count == 0 {
        1
    } else {
        (line_count as f32).log10().floor() as usize + 1
    };
    let char_width = font_size * 0.6;
    (char_width * digits as f32 + 20.0).max(30.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(""), 1);
        assert_eq!(count_lines("你好"), 1);
        assert_eq!(count_lines("a\nb\nc"), 3);
        assert_eq!(count_lines("a\n"), 2);
        assert_eq!(count_lines("\n\n\n"), 4);
    }

    #[test]
    fn test_gutter_width_grows_with_digits() {
        let narrow = gutter_width_for(9, 14.0);
        let wide = gutter_width_for(1234, 14.0);
        assert!(wide > narrow);
        // Never narrower than the minimum
        assert!(gutter_width_for(1, 8.0) >= 30.0);
    }

    #[test]
    fn test_apply_command_without_editor_state() {
        // Before the editor has rendered there is no stored TextEdit state;
        // the content edit must still go through.
        let ctx = egui::Context::default();
        let mut content = String::from("Hello world");
        let selection = apply_command(&ctx, &mut content, (0, 5), FormatCommand::Bold);
        assert_eq!(content, "**Hello** world");
        assert_eq!(selection, (2, 7));
    }

    #[test]
    fn test_apply_command_collapsed_selection_inserts_markers() {
        let ctx = egui::Context::default();
        let mut content = String::from("Hello");
        let selection = apply_command(&ctx, &mut content, (2, 2), FormatCommand::Bold);
        assert_eq!(content, "He****llo");
        assert_eq!(selection, (4, 4));
    }

    #[test]
    fn test_replace_char_range_cjk() {
        let ctx = egui::Context::default();
        let mut content = String::from("你好世界");
        replace_char_range(&ctx, &mut content, (1, 3), "、");
        assert_eq!(content, "你、界");
    }

    #[test]
    fn test_pane_renders_headless() {
        let ctx = egui::Context::default();
        let mut content = String::from("# 标题\n\n正文 **加粗**\n");
        let colors = ThemeColors::light();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let output = EditorPane::new(&mut content)
                    .font_size(14.0)
                    .show_line_numbers(true)
                    .show(ui, &colors);
                assert!(!output.changed);
                assert!(output.selection.is_none());
                assert!(output.caret.is_none());
            });
        });
    }
}
