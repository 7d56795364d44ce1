//! Configuration module for PixelMark
//!
//! This module handles user preferences, persisted user data (drafts, skins,
//! snippets, AI history) and their serialization to JSON files in
//! platform-specific directories.

mod persistence;
mod settings;
mod userdata;

pub use persistence::*;
pub use settings::*;
pub use userdata::*;
