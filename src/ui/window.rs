//! Edge resize handling for the borderless window.
//!
//! PixelMark draws its own title bar with native decorations disabled, so
//! resize affordances have to be reconstructed by hand: watch the pointer
//! near the window edges, swap the cursor, and start a native resize through
//! egui's ViewportCommand when the button goes down.

use eframe::egui::{self, CursorIcon, Pos2, Rect, ResizeDirection, ViewportCommand};

/// Width of the edge strip that starts a resize, in logical pixels.
const RESIZE_BORDER_WIDTH: f32 = 5.0;

/// Side length of the corner squares. Larger than the edge strip so
/// diagonal grabs are forgiving.
const CORNER_GRAB_SIZE: f32 = 10.0;

/// Tracks an in-progress resize across frames.
#[derive(Debug, Clone, Default)]
pub struct WindowResizeState {
    /// Resize direction under the pointer, if any
    current_direction: Option<ResizeDirection>,
    /// Whether a native resize has been started
    is_resizing: bool,
}

impl WindowResizeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_resizing(&self) -> bool {
        self.is_resizing
    }

    pub fn current_direction(&self) -> Option<ResizeDirection> {
        self.current_direction
    }
}

/// Run edge-resize detection for this frame.
///
/// Call at the start of `update`, before any UI is laid out. Returns `true`
/// while a resize is active or being started, in which case the title bar
/// must not begin a window drag.
pub fn handle_window_resize(ctx: &egui::Context, state: &mut WindowResizeState) -> bool {
    // A maximized window has no resize edges
    if ctx.input(|i| i.viewport().maximized.unwrap_or(false)) {
        state.current_direction = None;
        state.is_resizing = false;
        return false;
    }

    let (pointer_pos, primary_pressed, primary_down) = ctx.input(|i| {
        (
            i.pointer.hover_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
        )
    });

    // hover_pos() and screen_rect() are both window-local
    let window_rect = ctx.screen_rect();

    let Some(pointer_pos) = pointer_pos else {
        if !primary_down {
            state.current_direction = None;
            state.is_resizing = false;
        }
        return false;
    };

    // The native resize runs until the button is released
    if state.is_resizing {
        if !primary_down {
            state.is_resizing = false;
            state.current_direction = None;
        }
        return true;
    }

    let direction = detect_resize_direction(window_rect, pointer_pos);
    state.current_direction = direction;

    if let Some(dir) = direction {
        ctx.set_cursor_icon(direction_to_cursor(dir));

        if primary_pressed {
            ctx.send_viewport_cmd(ViewportCommand::BeginResize(dir));
            state.is_resizing = true;
            return true;
        }
    }

    false
}

/// Which resize direction, if any, the pointer position maps to.
fn detect_resize_direction(window_rect: Rect, pointer_pos: Pos2) -> Option<ResizeDirection> {
    let min = window_rect.min;
    let max = window_rect.max;

    let west = pointer_pos.x < min.x + CORNER_GRAB_SIZE;
    let east = pointer_pos.x > max.x - CORNER_GRAB_SIZE;
    let north = pointer_pos.y < min.y + CORNER_GRAB_SIZE;
    let south = pointer_pos.y > max.y - CORNER_GRAB_SIZE;

    // Corner squares win over edges
    match (north, south, west, east) {
        (true, _, true, _) => return Some(ResizeDirection::NorthWest),
        (true, _, _, true) => return Some(ResizeDirection::NorthEast),
        (_, true, true, _) => return Some(ResizeDirection::SouthWest),
        (_, true, _, true) => return Some(ResizeDirection::SouthEast),
        _ => {}
    }

    // Plain edges use the narrow strip; the corner zones above have already
    // consumed the ends, so a hit here is unambiguous.
    if pointer_pos.x < min.x + RESIZE_BORDER_WIDTH {
        Some(ResizeDirection::West)
    } else if pointer_pos.x > max.x - RESIZE_BORDER_WIDTH {
        Some(ResizeDirection::East)
    } else if pointer_pos.y < min.y + RESIZE_BORDER_WIDTH {
        Some(ResizeDirection::North)
    } else if pointer_pos.y > max.y - RESIZE_BORDER_WIDTH {
        Some(ResizeDirection::South)
    } else {
        None
    }
}

fn direction_to_cursor(direction: ResizeDirection) -> CursorIcon {
    match direction {
        ResizeDirection::North => CursorIcon::ResizeNorth,
        ResizeDirection::South => CursorIcon::ResizeSouth,
        ResizeDirection::East => CursorIcon::ResizeEast,
        ResizeDirection::West => CursorIcon::ResizeWest,
        ResizeDirection::NorthEast => CursorIcon::ResizeNorthEast,
        ResizeDirection::NorthWest => CursorIcon::ResizeNorthWest,
        ResizeDirection::SouthEast => CursorIcon::ResizeSouthEast,
        ResizeDirection::SouthWest => CursorIcon::ResizeSouthWest,
    }
}

/// Whether the pointer is inside any resize zone. The title bar uses this
/// to defer to resize handling instead of starting a window drag.
pub fn is_in_resize_zone(window_rect: Rect, pointer_pos: Pos2) -> bool {
    detect_resize_direction(window_rect, pointer_pos).is_some()
}
