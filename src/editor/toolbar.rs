//! Floating selection toolbar placement
//!
//! When the user selects text in the editor, a small formatting toolbar
//! floats just above the selection. Placement works from the caret position
//! of the selection end in content coordinates: subtract the editor's scroll
//! offsets to land in viewport space, then bias the box up and to the left
//! so it hovers over the selection instead of covering it.
//!
//! Measurement sits behind [`TextMeasurer`] so the arithmetic is testable
//! without a live text layout; [`GalleyMeasurer`] is the production
//! implementation over the editor's laid-out galley.

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Vertical bias: the toolbar floats this many points above the caret.
pub const BIAS_UP: f32 = 45.0;

/// Horizontal bias: the toolbar shifts this many points left of the caret.
pub const BIAS_LEFT: f32 = 50.0;

/// Minimum distance from the editor's top-left corner after clamping.
pub const MIN_MARGIN: f32 = 10.0;

// ─────────────────────────────────────────────────────────────────────────────
// Text Measurement
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves a character index to a caret position in content coordinates,
/// before any scrolling is applied.
pub trait TextMeasurer {
    /// `(top, left)` of the caret for `char_index`, or `None` when the
    /// index cannot be measured (for example while layout is stale).
    fn caret_offset(&self, char_index: usize) -> Option<(f32, f32)>;
}

/// Measures caret positions against the editor's laid-out galley.
pub struct GalleyMeasurer<'a> {
    galley: &'a egui::Galley,
}

impl<'a> GalleyMeasurer<'a> {
    pub fn new(galley: &'a egui::Galley) -> Self {
        Self { galley }
    }
}

impl TextMeasurer for GalleyMeasurer<'_> {
    fn caret_offset(&self, char_index: usize) -> Option<(f32, f32)> {
        // from_ccursor clamps out-of-range indices; a clamped caret would
        // place the toolbar somewhere unrelated to the selection, so reject
        // indices past the end instead.
        if char_index > self.galley.text().chars().count() {
            return None;
        }
        let cursor = self
            .galley
            .from_ccursor(egui::text::CCursor::new(char_index));
        let rect = self.galley.pos_from_cursor(&cursor);
        Some((rect.min.y, rect.min.x))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Toolbar Position
// ─────────────────────────────────────────────────────────────────────────────

/// Where the toolbar should be painted, relative to the editor viewport's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarPosition {
    pub top: f32,
    pub left: f32,
}

impl ToolbarPosition {
    /// Keep the toolbar inside the viewport. A selection near the top edge
    /// would otherwise push the box to negative coordinates.
    pub fn clamped(self) -> Self {
        Self {
            top: self.top.max(MIN_MARGIN),
            left: self.left.max(MIN_MARGIN),
        }
    }
}

/// Compute the toolbar position for the current selection, or `None` when
/// no toolbar should be shown.
///
/// The toolbar only appears for a non-empty selection: a collapsed caret
/// hides it, as does a selection whose end cannot be measured.
pub fn toolbar_position<M: TextMeasurer>(
    selection: Option<(usize, usize)>,
    measurer: &M,
    scroll_offset: (f32, f32),
) -> Option<ToolbarPosition> {
    let (start, end) = selection?;
    if start == end {
        return None;
    }

    // Selections can run in either direction; anchor at the later index.
    let (top, left) = measurer.caret_offset(start.max(end))?;
    let (scroll_y, scroll_x) = scroll_offset;
    Some(ToolbarPosition {
        top: top - scroll_y - BIAS_UP,
        left: left - scroll_x - BIAS_LEFT,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
