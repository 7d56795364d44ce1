//! Markdown rendering module
//!
//! Wraps comrak (CommonMark + GFM) to turn article source into the HTML
//! fragment the preview pipeline consumes. Formatting of the raw source
//! (toolbar bold/italic/heading commands) lives in the editor module, which
//! operates on text, not on the rendered output.

mod renderer;

pub use renderer::{render_markdown, render_markdown_with_options, MarkdownOptions};
