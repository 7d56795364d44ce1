//! Window icon loading for PixelMark
//!
//! Converts PNG icon data into `egui::IconData` for the native window.

use eframe::egui;
use image::GenericImageView;
use std::sync::Arc;

/// Icon PNG embedded at compile time (256x256).
#[cfg(feature = "bundle-icon")]
const EMBEDDED_ICON: &[u8] = include_bytes!("../../resources/icons/icon_256.png");

/// Decode PNG bytes into window icon data.
///
/// Returns `None` if the bytes are not a decodable image.
pub fn load_icon_from_png(png_data: &[u8]) -> Option<egui::IconData> {
    let image = image::load_from_memory(png_data).ok()?;
    let rgba = image.to_rgba8();
    let (width, height) = image.dimensions();

    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width,
        height,
    })
}

/// Load icon data from a PNG file on disk.
#[allow(dead_code)]
pub fn load_icon_from_file(path: &std::path::Path) -> Option<egui::IconData> {
    let data = std::fs::read(path).ok()?;
    load_icon_from_png(&data)
}

/// The application window icon.
///
/// Tries the embedded icon first (release builds with the `bundle-icon`
/// feature), then the resources directory, and degrades to the platform
/// default when neither is available.
pub fn get_app_icon() -> Option<Arc<egui::IconData>> {
    #[cfg(feature = "bundle-icon")]
    if let Some(icon) = load_icon_from_png(EMBEDDED_ICON) {
        log::info!("Loaded embedded application icon");
        return Some(Arc::new(icon));
    }

    let icon_paths = [
        "resources/icons/icon_256.png",
        "resources/icons/icon_128.png",
    ];

    for path in &icon_paths {
        let path = std::path::Path::new(path);
        if path.exists() {
            if let Some(icon) = load_icon_from_file(path) {
                log::info!("Loaded application icon from: {}", path.display());
                return Some(Arc::new(icon));
            }
        }
    }

    log::debug!("No application icon found, using default");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_icon_from_png_invalid_data() {
        assert!(load_icon_from_png(b"not a png file").is_none());
    }

    #[test]
    fn test_load_icon_from_file_nonexistent() {
        let path = std::path::Path::new("missing_icon.png");
        assert!(load_icon_from_file(path).is_none());
    }
}
