//! Article preview pane
//!
//! # Architecture
//!
//! - `document`: the materialized pipeline output, markdown rendered to a
//!   preview tree with every node's style resolved against the active skin
//! - `renderer`: paints the resolved preview tree into egui, driven by the
//!   same style resolution the clipboard export uses
//! - `sync_scroll`: keeps the editor and preview panes scrolled to the same
//!   relative position, with an echo-suppression window so the follower's
//!   programmatic scroll never bounces back

mod document;
mod renderer;
mod sync_scroll;

pub use document::PreviewDocument;
pub use renderer::PreviewRenderer;
pub use sync_scroll::{
    PaneMetrics, ScrollSyncConfig, ScrollSyncController, SyncDrive, SyncPane,
};
