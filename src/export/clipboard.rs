//! Clipboard export orchestration
//!
//! Drives one copy action end to end: precondition check on the rendered
//! preview, sanitized wrapper construction via [`DomSanitizingCloner`], and
//! the hand-off to the system clipboard with a plain-text fallback. Exports
//! are single-flight; a second request while one is running is rejected
//! rather than allowed to interleave.
//!
//! The clipboard itself sits behind [`ClipboardSink`] so tests capture the
//! payload instead of touching a real clipboard (which needs a display).

use arboard::Clipboard;
use log::{debug, info, warn};

use crate::dom::DomTree;
use crate::error::{Error, Result};
use crate::export::inline::inline_style;
use crate::export::sanitize::DomSanitizingCloner;
use crate::style::StyleResolver;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Provenance attribute carried by the export wrapper element.
pub const PROVENANCE_ATTR: &str = "data-tool";

/// Provenance value identifying payloads produced by this application.
pub const PROVENANCE_VALUE: &str = "pixelmark";

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Sink
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for one export payload: rich HTML plus plain-text fallback.
pub trait ClipboardSink {
    fn set_html(&mut self, html: &str, plain_text: &str) -> Result<()>;
}

/// The real system clipboard, via arboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_html(&mut self, html: &str, plain_text: &str) -> Result<()> {
        let mut clipboard =
            Clipboard::new().map_err(|e| Error::ClipboardAccess(e.to_string()))?;
        clipboard
            .set_html(html, Some(plain_text))
            .map_err(|e| Error::ClipboardWrite(e.to_string()))?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Copy Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Non-error results of a copy request. Clipboard failures surface as
/// [`Error`] instead, since those need a blocking prompt rather than a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The wrapper fragment landed on the clipboard.
    Copied,
    /// The preview had no non-whitespace text; nothing was built.
    NothingToCopy,
    /// Another export was still in flight; this request was dropped.
    Busy,
}

// ─────────────────────────────────────────────────────────────────────────────
// ClipboardExporter
// ─────────────────────────────────────────────────────────────────────────────

/// Orchestrates sanitized copies of the preview tree, one at a time.
#[derive(Debug, Default)]
pub struct ClipboardExporter {
    in_flight: bool,
}

impl ClipboardExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an export is running. The copy trigger in the UI is
    /// disabled off this flag.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Copy the preview tree to the clipboard in style-inlined form.
    ///
    /// The in-flight flag is released on every return path, success or
    /// failure, so one failed export never wedges the copy action.
    pub fn export<R, S>(
        &mut self,
        tree: &DomTree,
        resolver: &R,
        sink: &mut S,
    ) -> Result<CopyOutcome>
    where
        R: StyleResolver,
        S: ClipboardSink,
    {
        if self.in_flight {
            debug!("Copy request dropped: an export is already in flight");
            return Ok(CopyOutcome::Busy);
        }

        let plain_text = tree.text_content(tree.root());
        if plain_text.trim().is_empty() {
            info!("Copy requested with an empty preview");
            return Ok(CopyOutcome::NothingToCopy);
        }

        self.in_flight = true;
        let html = build_export_html(tree, resolver);
        let result = sink.set_html(&html, &plain_text);
        self.in_flight = false;

        match result {
            Ok(()) => {
                info!("Copied {} bytes of inlined preview HTML", html.len());
                Ok(CopyOutcome::Copied)
            }
            Err(err) => {
                warn!("Clipboard export failed: {}", err);
                Err(err)
            }
        }
    }
}

/// Build the sanitized wrapper fragment for one export: a provenance-marked
/// `<section>` carrying the preview container's own inlined style, wrapping
/// sanitized clones of the preview root's children.
pub fn build_export_html<R: StyleResolver>(tree: &DomTree, resolver: &R) -> String {
    let mut out = DomTree::with_root(
        "section",
        vec![(PROVENANCE_ATTR.to_string(), PROVENANCE_VALUE.to_string())],
    );

    let container_style = inline_style(&resolver.resolve(tree.root()));
    if !container_style.is_empty() {
        out.set_attr(out.root(), "style", container_style);
    }

    let cloner = DomSanitizingCloner::new(tree, resolver);
    let out_root = out.root();
    cloner.clone_children_into(&mut out, tree.root(), out_root);
    out.to_html(out.root())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
