//! Article preview rendering
//!
//! Paints the resolved preview tree into the preview pane. Every visual
//! decision comes from the same [`ResolvedStyles`] table the clipboard
//! export serializes, so the pane is an honest preview of what lands in the
//! paste target, including `::before`/`::after` generated content.
//!
//! egui has no HTML layout engine, so this is a deliberate approximation:
//! block elements stack vertically with their resolved margins, inline runs
//! become one `LayoutJob` per block, and a small set of decorations
//! (background, left border bar, radius, padding) is honored. Bold text is
//! simulated by pushing the color toward full contrast, since the bundled
//! fonts carry a single weight.

use eframe::egui::text::LayoutJob;
use eframe::egui::{self, Color32, FontId, Margin, Rect, RichText, Stroke, TextFormat, Ui};

use crate::dom::{DomTree, Node, NodeId};
use crate::export::visible_content;
use crate::style::{PseudoElement, ResolvedStyles, StyleResolver, StyleSnapshot};

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

const BODY_TEXT_SIZE: f32 = 15.0;
const CODE_TEXT_SIZE: f32 = 13.5;
const BLOCK_GAP: f32 = 8.0;
const DEFAULT_TEXT: Color32 = Color32::from_rgb(38, 38, 38);
const DEFAULT_BACKGROUND: Color32 = Color32::WHITE;
const DEFAULT_LINK: Color32 = Color32::from_rgb(0, 110, 190);
const DEFAULT_CODE_BG: Color32 = Color32::from_rgb(243, 244, 244);
const DEFAULT_PRE_BG: Color32 = Color32::from_rgb(40, 44, 52);
const DEFAULT_PRE_TEXT: Color32 = Color32::from_rgb(171, 178, 191);
const DEFAULT_QUOTE_BAR: Color32 = Color32::from_rgb(221, 221, 221);

/// Default heading size when the skin does not set one.
fn default_heading_size(tag: &str) -> Option<f32> {
    match tag {
        "h1" => Some(24.0),
        "h2" => Some(20.0),
        "h3" => Some(17.5),
        "h4" => Some(16.0),
        "h5" => Some(15.0),
        "h6" => Some(14.0),
        _ => None,
    }
}

/// Tags rendered as part of a text run rather than as their own block.
fn is_inline_tag(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "b"
            | "br"
            | "code"
            | "del"
            | "em"
            | "i"
            | "input"
            | "mark"
            | "s"
            | "small"
            | "span"
            | "strong"
            | "sub"
            | "sup"
            | "u"
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// PreviewRenderer
// ─────────────────────────────────────────────────────────────────────────────

/// Renders one resolved preview tree into an egui pane.
pub struct PreviewRenderer<'a> {
    tree: &'a DomTree,
    styles: &'a ResolvedStyles,
}

impl<'a> PreviewRenderer<'a> {
    pub fn new(tree: &'a DomTree, styles: &'a ResolvedStyles) -> Self {
        Self { tree, styles }
    }

    /// Paint the whole article. The caller owns the scroll area.
    pub fn show(&self, ui: &mut Ui) {
        let root_style = self.styles.resolve(self.tree.root());
        let fill = color_of(&root_style, "background-color").unwrap_or(DEFAULT_BACKGROUND);
        let margin = padding_of(&root_style, 20.0);

        egui::Frame::none()
            .fill(fill)
            .inner_margin(margin)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                for child in self.tree.children(self.tree.root()) {
                    self.show_block(ui, *child);
                }
            });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn show_block(&self, ui: &mut Ui, node: NodeId) {
        let element = match self.tree.get(node) {
            Node::Text(text) => {
                // Stray top-level text (whitespace between blocks, usually).
                if !text.trim().is_empty() {
                    ui.label(RichText::new(text.trim()).color(DEFAULT_TEXT));
                }
                return;
            }
            Node::Element(element) => element,
        };

        let style = self.styles.resolve(node);
        space(ui, style.get("margin-top"), 0.0);

        match element.tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" => {
                self.show_paragraph_like(ui, node, &style)
            }
            "ul" | "ol" => self.show_list(ui, node, &style, 0),
            "blockquote" => self.show_blockquote(ui, node, &style),
            "pre" => self.show_code_block(ui, node, &style),
            "hr" => {
                ui.separator();
            }
            "img" => self.show_image(ui, node),
            "table" => self.show_table(ui, node),
            tag if is_inline_tag(tag) => self.show_paragraph_like(ui, node, &style),
            // Generic containers: render children as blocks.
            _ => {
                for child in self.tree.children(node) {
                    self.show_block(ui, *child);
                }
            }
        }

        space(ui, style.get("margin-bottom"), BLOCK_GAP);
    }

    fn show_paragraph_like(&self, ui: &mut Ui, node: NodeId, style: &StyleSnapshot) {
        let element = match self.tree.element(node) {
            Some(element) => element,
            None => return,
        };

        let format = self.block_format(&element.tag, style);
        let centered = style.get("text-align") == Some("center");

        self.decorated_block(ui, style, None, |renderer, ui| {
            let indent = px_of(style, "text-indent").unwrap_or(0.0);
            let mut job = new_job(ui);
            renderer.append_element_run(&mut job, node, &format, indent);
            if job.is_empty() {
                return;
            }
            if centered {
                ui.vertical_centered(|ui| ui.label(job));
            } else {
                ui.label(job);
            }
        });
    }

    fn show_blockquote(&self, ui: &mut Ui, node: NodeId, style: &StyleSnapshot) {
        let bar = style
            .get("border-left")
            .and_then(parse_border)
            .unwrap_or((4.0, DEFAULT_QUOTE_BAR));

        self.decorated_block(ui, style, Some(bar), |renderer, ui| {
            for child in renderer.tree.children(node) {
                renderer.show_block(ui, *child);
            }
        });
    }

    fn show_code_block(&self, ui: &mut Ui, node: NodeId, style: &StyleSnapshot) {
        let fill = color_of(style, "background-color").unwrap_or(DEFAULT_PRE_BG);
        let text_color = color_of(style, "color").unwrap_or(DEFAULT_PRE_TEXT);
        let radius = px_of(style, "border-radius").unwrap_or(4.0);

        let code = self.tree.text_content(node);
        let code = code.strip_suffix('\n').unwrap_or(&code);

        egui::Frame::none()
            .fill(fill)
            .rounding(radius)
            .inner_margin(Margin::symmetric(12.0, 10.0))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                let mut job = new_job(ui);
                job.append(
                    code,
                    0.0,
                    TextFormat::simple(FontId::monospace(CODE_TEXT_SIZE), text_color),
                );
                ui.label(job);
            });
    }

    fn show_list(&self, ui: &mut Ui, node: NodeId, style: &StyleSnapshot, depth: usize) {
        let element = match self.tree.element(node) {
            Some(element) => element,
            None => return,
        };
        let style_type = style.get("list-style-type");
        let indent = 6.0 + depth as f32 * 18.0;

        let mut index = 0;
        for child in self.tree.children(node) {
            let Some(li) = self.tree.element(*child) else {
                continue;
            };
            if li.tag != "li" {
                continue;
            }
            let marker = list_marker(&element.tag, style_type, index);
            index += 1;
            self.show_list_item(ui, *child, marker.as_deref(), indent, depth);
        }
    }

    fn show_list_item(
        &self,
        ui: &mut Ui,
        li: NodeId,
        marker: Option<&str>,
        indent: f32,
        depth: usize,
    ) {
        let li_style = self.styles.resolve(li);
        let format = self.block_format("li", &li_style);

        // Nested lists render below the item's own inline run.
        let mut nested = Vec::new();
        ui.horizontal_top(|ui| {
            ui.add_space(indent);
            if let Some(marker) = marker {
                let mut marker_format = format.clone();
                marker_format.color = strengthen(marker_format.color);
                let mut job = LayoutJob::default();
                job.append(marker, 0.0, marker_format);
                ui.label(job);
            }
            ui.vertical(|ui| {
                let mut job = new_job(ui);
                for child in self.tree.children(li) {
                    match self.tree.get(*child) {
                        Node::Element(el) if el.tag == "ul" || el.tag == "ol" => {
                            nested.push(*child);
                        }
                        Node::Element(el) if el.tag == "p" => {
                            self.append_element_run(&mut job, *child, &format, 0.0);
                            job.append("\n", 0.0, format.clone());
                        }
                        _ => self.append_inline(&mut job, *child, &format),
                    }
                }
                trim_trailing_newline(&mut job);
                if !job.is_empty() {
                    ui.label(job);
                }
                for list in &nested {
                    let nested_style = self.styles.resolve(*list);
                    self.show_list(ui, *list, &nested_style, depth + 1);
                }
            });
        });
        ui.add_space(3.0);
    }

    fn show_image(&self, ui: &mut Ui, node: NodeId) {
        // AI-generated images arrive as data: URLs and can be shown for
        // real; remote URLs get a placeholder frame with the alt text.
        if let Some(src) = self.tree.attr(node, "src") {
            if src.starts_with("data:") {
                if let Some(texture) = data_url_texture(ui, src) {
                    let size = texture.size_vec2();
                    let scale = (ui.available_width() / size.x).min(1.0);
                    ui.vertical_centered(|ui| {
                        ui.add(egui::Image::new(&texture).fit_to_exact_size(size * scale));
                    });
                    return;
                }
            }
        }

        let label = self
            .tree
            .attr(node, "alt")
            .filter(|alt| !alt.is_empty())
            .or_else(|| self.tree.attr(node, "src"))
            .unwrap_or("image");

        ui.vertical_centered(|ui| {
            egui::Frame::none()
                .stroke(Stroke::new(1.0, Color32::from_gray(200)))
                .rounding(4.0)
                .inner_margin(Margin::symmetric(24.0, 18.0))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!("🖼 {}", label)).color(Color32::from_gray(120)),
                    );
                });
        });
    }

    fn show_table(&self, ui: &mut Ui, node: NodeId) {
        let mut rows = Vec::new();
        self.collect_table_rows(node, &mut rows);
        if rows.is_empty() {
            return;
        }

        egui::Grid::new(egui::Id::new(("preview-table", node)))
            .striped(true)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for row in rows {
                    for cell in self.tree.children(row) {
                        let Some(element) = self.tree.element(*cell) else {
                            continue;
                        };
                        if element.tag != "td" && element.tag != "th" {
                            continue;
                        }
                        let style = self.styles.resolve(*cell);
                        let mut format = self.block_format(&element.tag, &style);
                        if element.tag == "th" {
                            format.color = strengthen(format.color);
                        }
                        let mut job = LayoutJob::default();
                        self.append_element_run(&mut job, *cell, &format, 0.0);
                        ui.label(job);
                    }
                    ui.end_row();
                }
            });
    }

    fn collect_table_rows(&self, node: NodeId, rows: &mut Vec<NodeId>) {
        for child in self.tree.children(node) {
            if let Some(element) = self.tree.element(*child) {
                if element.tag == "tr" {
                    rows.push(*child);
                } else {
                    self.collect_table_rows(*child, rows);
                }
            }
        }
    }

    /// Paint a block wrapped in its resolved decorations: background fill,
    /// padding, corner radius, and an optional left border bar.
    fn decorated_block(
        &self,
        ui: &mut Ui,
        style: &StyleSnapshot,
        left_bar: Option<(f32, Color32)>,
        content: impl FnOnce(&Self, &mut Ui),
    ) {
        let fill = color_of(style, "background-color").unwrap_or(Color32::TRANSPARENT);
        let radius = px_of(style, "border-radius").unwrap_or(0.0);
        let mut margin = padding_of(style, 0.0);
        let bar = left_bar.or_else(|| style.get("border-left").and_then(parse_border));
        if let Some((width, _)) = bar {
            margin.left += width + 8.0;
        }

        let frame = egui::Frame::none()
            .fill(fill)
            .rounding(radius)
            .inner_margin(margin);
        let response = frame.show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            content(self, ui);
        });

        if let Some((width, color)) = bar {
            let rect = response.response.rect;
            let bar_rect =
                Rect::from_min_max(rect.left_top(), egui::pos2(rect.left() + width, rect.bottom()));
            ui.painter().rect_filled(bar_rect, 0.0, color);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline Runs
    // ─────────────────────────────────────────────────────────────────────────

    /// Append an element's full inline run: `::before`, children, `::after`.
    fn append_element_run(&self, job: &mut LayoutJob, node: NodeId, format: &TextFormat, indent: f32) {
        if let Some(snapshot) = self.styles.resolve_pseudo(node, PseudoElement::Before) {
            if let Some(text) = visible_content(&snapshot) {
                job.append(&text, indent, pseudo_format(&snapshot, format));
            }
        }

        let mut first = job.is_empty();
        for child in self.tree.children(node) {
            let leading = if first { indent } else { 0.0 };
            first = false;
            self.append_inline_with_leading(job, *child, format, leading);
        }

        if let Some(snapshot) = self.styles.resolve_pseudo(node, PseudoElement::After) {
            if let Some(text) = visible_content(&snapshot) {
                job.append(&text, 0.0, pseudo_format(&snapshot, format));
            }
        }
    }

    fn append_inline(&self, job: &mut LayoutJob, node: NodeId, format: &TextFormat) {
        self.append_inline_with_leading(job, node, format, 0.0);
    }

    fn append_inline_with_leading(
        &self,
        job: &mut LayoutJob,
        node: NodeId,
        format: &TextFormat,
        leading: f32,
    ) {
        match self.tree.get(node) {
            Node::Text(text) => job.append(text, leading, format.clone()),
            Node::Element(element) => match element.tag.as_str() {
                "br" => job.append("\n", 0.0, format.clone()),
                "input" => {
                    // Task-list checkboxes from the tasklist extension.
                    let checked = self.tree.attr(node, "checked").is_some();
                    let mark = if checked { "☑ " } else { "☐ " };
                    job.append(mark, leading, format.clone());
                }
                "img" => {
                    let alt = self.tree.attr(node, "alt").unwrap_or("image");
                    let mut muted = format.clone();
                    muted.color = Color32::from_gray(130);
                    muted.italics = true;
                    job.append(&format!("[{}]", alt), leading, muted);
                }
                _ => {
                    let derived = self.inline_format(node, &element.tag, format);
                    self.append_element_run(job, node, &derived, leading);
                }
            },
        }
    }

    /// Base text format for a block element.
    fn block_format(&self, tag: &str, style: &StyleSnapshot) -> TextFormat {
        let size = px_of(style, "font-size")
            .or_else(|| default_heading_size(tag))
            .unwrap_or(BODY_TEXT_SIZE);
        let mut color = color_of(style, "color").unwrap_or(DEFAULT_TEXT);
        if matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
            color = strengthen(color);
        }

        let mut format = TextFormat::simple(FontId::proportional(size), color);
        apply_snapshot_format(&mut format, style);
        format
    }

    /// Text format for an inline element: tag defaults under the resolved
    /// style, both layered over the parent's format.
    fn inline_format(&self, node: NodeId, tag: &str, parent: &TextFormat) -> TextFormat {
        let mut format = parent.clone();
        match tag {
            "strong" | "b" => format.color = strengthen(format.color),
            "em" | "i" => format.italics = true,
            "del" | "s" => format.strikethrough = Stroke::new(1.0, format.color),
            "u" => format.underline = Stroke::new(1.0, format.color),
            "code" => {
                format.font_id = FontId::monospace(format.font_id.size * 0.92);
                format.background = DEFAULT_CODE_BG;
            }
            "a" => {
                format.color = DEFAULT_LINK;
                format.underline = Stroke::new(1.0, DEFAULT_LINK);
            }
            "small" => format.font_id.size *= 0.85,
            _ => {}
        }

        let style = self.styles.resolve(node);
        apply_snapshot_format(&mut format, &style);
        format
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Images
// ─────────────────────────────────────────────────────────────────────────────

/// Decode and cache a `data:` URL as an egui texture. Textures are keyed by
/// the URL itself, so repeated frames reuse the upload.
fn data_url_texture(ui: &Ui, src: &str) -> Option<egui::TextureHandle> {
    let key = egui::Id::new(("preview-image", src));
    if let Some(texture) = ui.ctx().data(|d| d.get_temp::<egui::TextureHandle>(key)) {
        return Some(texture);
    }

    let bytes = decode_data_url(src)?;
    let decoded = image::load_from_memory(&bytes).ok()?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    let texture = ui
        .ctx()
        .load_texture("preview-image", color_image, egui::TextureOptions::LINEAR);
    ui.ctx().data_mut(|d| d.insert_temp(key, texture.clone()));
    Some(texture)
}

fn decode_data_url(src: &str) -> Option<Vec<u8>> {
    use base64::Engine as _;
    let (_, payload) = src.split_once(";base64,")?;
    base64::engine::general_purpose::STANDARD.decode(payload.trim()).ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Format Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn new_job(ui: &Ui) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = ui.available_width();
    job
}

fn space(ui: &mut Ui, value: Option<&str>, fallback: f32) {
    let amount = value.and_then(parse_px).unwrap_or(fallback);
    if amount > 0.0 {
        ui.add_space(amount);
    }
}

fn trim_trailing_newline(job: &mut LayoutJob) {
    if job.text.ends_with('\n') {
        let len = job.text.len() - 1;
        job.text.truncate(len);
        if let Some(section) = job.sections.last_mut() {
            section.byte_range.end = section.byte_range.end.min(len);
        }
    }
}

/// Layer a snapshot's text properties onto an existing format.
fn apply_snapshot_format(format: &mut TextFormat, style: &StyleSnapshot) {
    if let Some(color) = color_of(style, "color") {
        format.color = color;
    }
    if let Some(size) = px_of(style, "font-size") {
        format.font_id.size = size;
    }
    if let Some(weight) = style.get("font-weight") {
        if is_bold_weight(weight) {
            format.color = strengthen(format.color);
        }
    }
    if style.get("font-style") == Some("italic") {
        format.italics = true;
    }
    match style.get("text-decoration") {
        Some(value) if value.contains("underline") => {
            format.underline = Stroke::new(1.0, format.color);
        }
        Some(value) if value.contains("line-through") => {
            format.strikethrough = Stroke::new(1.0, format.color);
        }
        _ => {}
    }
    if let Some(spacing) = px_of(style, "letter-spacing") {
        format.extra_letter_spacing = spacing;
    }
    if let Some(line_height) = style
        .get("line-height")
        .and_then(|v| parse_line_height(v, format.font_id.size))
    {
        format.line_height = Some(line_height);
    }
    if let Some(background) = color_of(style, "background-color") {
        format.background = background;
    }
}

/// Text format for generated content: the pseudo snapshot layered over the
/// originating element's format.
fn pseudo_format(snapshot: &StyleSnapshot, base: &TextFormat) -> TextFormat {
    let mut format = base.clone();
    apply_snapshot_format(&mut format, snapshot);
    format
}

fn color_of(style: &StyleSnapshot, name: &str) -> Option<Color32> {
    style.get(name).and_then(parse_color)
}

fn px_of(style: &StyleSnapshot, name: &str) -> Option<f32> {
    style.get(name).and_then(parse_px)
}

fn padding_of(style: &StyleSnapshot, fallback: f32) -> Margin {
    Margin {
        left: px_of(style, "padding-left").unwrap_or(fallback),
        right: px_of(style, "padding-right").unwrap_or(fallback),
        top: px_of(style, "padding-top").unwrap_or(fallback),
        bottom: px_of(style, "padding-bottom").unwrap_or(fallback),
    }
}

/// Push a color toward full contrast against its own lightness, simulating
/// a heavier font weight.
fn strengthen(color: Color32) -> Color32 {
    let [r, g, b, a] = color.to_array();
    let luminance = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    let target = if luminance < 128.0 { 0u8 } else { 255u8 };
    let mix = |c: u8| -> u8 {
        let c = c as f32;
        (c + (target as f32 - c) * 0.45).round() as u8
    };
    Color32::from_rgba_unmultiplied(mix(r), mix(g), mix(b), a)
}

fn is_bold_weight(value: &str) -> bool {
    match value {
        "bold" | "bolder" => true,
        other => other.parse::<u32>().map_or(false, |w| w >= 600),
    }
}

/// Marker text for a list item, or `None` when markers are hidden.
fn list_marker(list_tag: &str, style_type: Option<&str>, index: usize) -> Option<String> {
    if style_type == Some("none") {
        return None;
    }
    if list_tag == "ol" {
        return Some(format!("{}. ", index + 1));
    }
    let marker = match style_type {
        Some("circle") => "◦ ",
        Some("square") => "▪ ",
        _ => "• ",
    };
    Some(marker.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Value Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a pixel length (`"16px"`). Other units are not understood and the
/// caller's default applies.
fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// Parse a line-height: unitless multiplier or pixel length.
fn parse_line_height(value: &str, font_size: f32) -> Option<f32> {
    let value = value.trim();
    if let Some(px) = parse_px(value) {
        return Some(px);
    }
    value.parse::<f32>().ok().map(|factor| factor * font_size)
}

/// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`,
/// plus the handful of keywords skins actually use.
fn parse_color(value: &str) -> Option<Color32> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_color(hex);
    }
    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
    {
        return parse_rgb_args(args.strip_suffix(')')?);
    }

    match value.to_ascii_lowercase().as_str() {
        "white" => Some(Color32::WHITE),
        "black" => Some(Color32::BLACK),
        "red" => Some(Color32::from_rgb(255, 0, 0)),
        "green" => Some(Color32::from_rgb(0, 128, 0)),
        "blue" => Some(Color32::from_rgb(0, 0, 255)),
        "gray" | "grey" => Some(Color32::from_rgb(128, 128, 128)),
        "transparent" => Some(Color32::TRANSPARENT),
        _ => None,
    }
}

fn parse_hex_color(hex: &str) -> Option<Color32> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let expand = |s: &str| channel(&format!("{}{}", s, s));
            Some(Color32::from_rgb(
                expand(&hex[0..1])?,
                expand(&hex[1..2])?,
                expand(&hex[2..3])?,
            ))
        }
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color32> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8)
    };
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if parts.len() == 4 {
        (parts[3].parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    Some(Color32::from_rgba_unmultiplied(r, g, b, a))
}

/// Parse a one-side border shorthand (`"4px solid #42b983"`) into its width
/// and color.
fn parse_border(value: &str) -> Option<(f32, Color32)> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() < 2 || value == "none" {
        return None;
    }
    let width = parse_px(tokens[0])?;
    let color = tokens.iter().skip(1).find_map(|t| parse_color(t))?;
    Some((width, color))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("16px"), Some(16.0));
        assert_eq!(parse_px(" 7.5px "), Some(7.5));
        assert_eq!(parse_px("0px"), Some(0.0));
        assert_eq!(parse_px("1.5em"), None);
        assert_eq!(parse_px("16"), None);
    }

    #[test]
    fn test_parse_line_height() {
        assert_eq!(parse_line_height("24px", 15.0), Some(24.0));
        assert_eq!(parse_line_height("1.75", 16.0), Some(28.0));
        assert_eq!(parse_line_height("normal", 16.0), None);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#fff"), Some(Color32::WHITE));
        assert_eq!(parse_color("#42b983"), Some(Color32::from_rgb(0x42, 0xb9, 0x83)));
        assert_eq!(
            parse_color("#11223344"),
            Some(Color32::from_rgba_unmultiplied(0x11, 0x22, 0x33, 0x44))
        );
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzz"), None);
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(
            parse_color("rgb(255, 0, 128)"),
            Some(Color32::from_rgb(255, 0, 128))
        );
        assert_eq!(
            parse_color("rgba(0, 0, 0, 0.5)"),
            Some(Color32::from_rgba_unmultiplied(0, 0, 0, 128))
        );
        assert_eq!(parse_color("rgb(1,2)"), None);
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color("white"), Some(Color32::WHITE));
        assert_eq!(parse_color("transparent"), Some(Color32::TRANSPARENT));
        assert_eq!(parse_color("cornflowerblue"), None);
    }

    #[test]
    fn test_parse_border() {
        assert_eq!(
            parse_border("4px solid #42b983"),
            Some((4.0, Color32::from_rgb(0x42, 0xb9, 0x83)))
        );
        assert_eq!(
            parse_border("1px dashed rgba(0,0,0,0.2)"),
            Some((1.0, Color32::from_rgba_unmultiplied(0, 0, 0, 51)))
        );
        assert_eq!(parse_border("none"), None);
        assert_eq!(parse_border("solid"), None);
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(list_marker("ul", None, 0), Some("• ".to_string()));
        assert_eq!(list_marker("ul", Some("square"), 2), Some("▪ ".to_string()));
        assert_eq!(list_marker("ol", None, 0), Some("1. ".to_string()));
        assert_eq!(list_marker("ol", None, 4), Some("5. ".to_string()));
        assert_eq!(list_marker("ul", Some("none"), 0), None);
        assert_eq!(list_marker("ol", Some("none"), 0), None);
    }

    #[test]
    fn test_bold_weight_classification() {
        assert!(is_bold_weight("bold"));
        assert!(is_bold_weight("700"));
        assert!(is_bold_weight("600"));
        assert!(!is_bold_weight("400"));
        assert!(!is_bold_weight("normal"));
    }

    #[test]
    fn test_inline_tag_classification() {
        assert!(is_inline_tag("strong"));
        assert!(is_inline_tag("code"));
        assert!(is_inline_tag("br"));
        assert!(!is_inline_tag("p"));
        assert!(!is_inline_tag("blockquote"));
    }

    #[test]
    fn test_strengthen_pushes_toward_contrast() {
        let dark = strengthen(Color32::from_rgb(60, 60, 60));
        assert!(dark.r() < 60);
        let light = strengthen(Color32::from_rgb(200, 200, 200));
        assert!(light.r() > 200);
    }

    #[test]
    fn test_apply_snapshot_format() {
        let style = StyleSnapshot::from_pairs([
            ("color", "#ff0000"),
            ("font-size", "22px"),
            ("font-style", "italic"),
            ("letter-spacing", "2px"),
            ("line-height", "2"),
        ]);
        let mut format = TextFormat::simple(FontId::proportional(15.0), DEFAULT_TEXT);
        apply_snapshot_format(&mut format, &style);

        assert_eq!(format.color, Color32::from_rgb(255, 0, 0));
        assert_eq!(format.font_id.size, 22.0);
        assert!(format.italics);
        assert_eq!(format.extra_letter_spacing, 2.0);
        assert_eq!(format.line_height, Some(44.0));
    }

    #[test]
    fn test_default_heading_sizes_descend() {
        let sizes: Vec<f32> = ["h1", "h2", "h3", "h4", "h5", "h6"]
            .iter()
            .map(|tag| default_heading_size(tag).unwrap())
            .collect();
        for pair in sizes.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert_eq!(default_heading_size("p"), None);
    }

    #[test]
    fn test_decode_data_url() {
        assert_eq!(
            decode_data_url("data:image/png;base64,QUJD"),
            Some(b"ABC".to_vec())
        );
        // Whitespace around the payload is tolerated.
        assert_eq!(
            decode_data_url("data:image/jpeg;base64, QUJD "),
            Some(b"ABC".to_vec())
        );
        assert_eq!(decode_data_url("https://example.com/a.png"), None);
        assert_eq!(decode_data_url("data:image/png;base64,@@@"), None);
    }
}
