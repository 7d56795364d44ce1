//! File operations module for PixelMark
//!
//! Native pickers for the JSON import/export flows, the import/export
//! logic itself, and external viewing of generated images.

pub mod dialogs;
pub mod transfer;
