//! Native file dialog integration using the rfd crate
//!
//! Settings and user data travel as JSON files, so the pickers here are
//! JSON-only. Dialog titles are user-facing and localized like the rest
//! of the UI.

use rfd::FileDialog;
use std::path::PathBuf;

const JSON_EXTENSIONS: &[&str] = &["json"];

/// Default file name offered when exporting settings.
pub const CONFIG_EXPORT_NAME: &str = "编辑器配置文件.json";

/// Default file name offered when exporting user data.
pub const USER_DATA_EXPORT_NAME: &str = "用户数据备份.json";

/// Open a native picker for a JSON file to import.
///
/// Returns `Some(PathBuf)` if a file was selected, `None` if cancelled.
pub fn open_json_dialog(title: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title(title)
        .add_filter("JSON 文件", JSON_EXTENSIONS)
        .pick_file()
}

/// Open a native save dialog for a JSON export.
///
/// Returns `Some(PathBuf)` if a location was chosen, `None` if cancelled.
pub fn save_json_dialog(title: &str, default_name: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title(title)
        .set_file_name(default_name)
        .add_filter("JSON 文件", JSON_EXTENSIONS)
        .save_file()
}
