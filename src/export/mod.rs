//! Clipboard export engine
//!
//! Everything between the rendered preview tree and the paste target: the
//! style inliner, pseudo-element materialization, the sanitizing cloner,
//! and the exporter that owns the copy action itself. The paste target (the
//! WeChat article editor) strips `<style>`, `class` and `id`, so the whole
//! pipeline exists to push every visual decision into inline `style`
//! attributes that survive that stripping.
//!
//! # Architecture
//!
//! - `inline.rs` - allow-list style serialization per node
//! - `pseudo.rs` - `::before`/`::after` materialization as real spans
//! - `sanitize.rs` - depth-first sanitizing clone of the preview tree
//! - `clipboard.rs` - export orchestration and the system clipboard sink

mod clipboard;
mod inline;
mod pseudo;
mod sanitize;

pub use clipboard::{
    build_export_html, ClipboardExporter, ClipboardSink, CopyOutcome, SystemClipboard,
    PROVENANCE_ATTR, PROVENANCE_VALUE,
};
pub use inline::{inline_style, inline_style_excluding};
pub use pseudo::{materialize_pseudo, visible_content};
pub use sanitize::DomSanitizingCloner;
