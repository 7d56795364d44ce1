//! Editor module for PixelMark
//!
//! The markdown source pane and its supporting pieces: the editor widget
//! itself, inline formatting commands, the floating toolbar positioner,
//! word counting and the lightweight syntax checks surfaced as warning
//! chips.

mod formatting;
mod stats;
mod syntax_check;
mod toolbar;
mod widget;

pub use formatting::{apply_format, FormatCommand, FormatResult};
pub use stats::{count_words, WordCount};
pub use syntax_check::{check_syntax, SyntaxIssue};
pub use toolbar::{toolbar_position, GalleyMeasurer, TextMeasurer, ToolbarPosition};
pub use widget::{apply_command, editor_id, EditorOutput, EditorPane};
