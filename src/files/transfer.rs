//! Import and export of settings and user data
//!
//! Backups travel as the same pretty-printed JSON the config directory
//! uses, so an exported file can be hand-edited or dropped onto another
//! machine. Imports run through the sanitizing constructors, which clamp
//! out-of-range values instead of rejecting the file.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::{unix_millis, Settings, UserData};
use crate::error::{Error, Result};

/// Write settings to an export file chosen by the user.
pub fn export_settings(path: &Path, settings: &Settings) -> Result<()> {
    write_json(path, settings)?;
    info!("Settings exported to {}", path.display());
    Ok(())
}

/// Read and sanitize settings from an export file.
pub fn import_settings(path: &Path) -> Result<Settings> {
    let json = read_file(path)?;
    let settings = Settings::from_json_sanitized(&json)?;
    info!("Settings imported from {}", path.display());
    Ok(settings)
}

/// Write user data (drafts, history, custom skins) to an export file.
pub fn export_user_data(path: &Path, data: &UserData) -> Result<()> {
    write_json(path, data)?;
    info!("User data exported to {}", path.display());
    Ok(())
}

/// Read and sanitize user data from an export file.
pub fn import_user_data(path: &Path) -> Result<UserData> {
    let json = read_file(path)?;
    let data = UserData::from_json_sanitized(&json)?;
    info!("User data imported from {}", path.display());
    Ok(data)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// External Image Viewing
// ─────────────────────────────────────────────────────────────────────────────

/// Open a generated image in the system viewer or browser.
///
/// Remote URLs go straight to the default browser. Data URLs cannot be
/// opened externally as-is, so their payload is decoded into a temp file
/// first.
pub fn open_image_url(url: &str) -> Result<()> {
    let target = if url.starts_with("data:") {
        let path = write_temp_image(url)?;
        path.to_string_lossy().into_owned()
    } else {
        url.to_owned()
    };

    open::that(&target).map_err(|e| Error::Application(format!(
        "failed to open image viewer: {}",
        e
    )))
}

/// Decode a `data:image/...;base64,` URL into a temp file, returning its path.
fn write_temp_image(url: &str) -> Result<PathBuf> {
    use base64::Engine as _;

    let (header, payload) = url
        .split_once(";base64,")
        .ok_or_else(|| Error::Application("unsupported image data URL".to_string()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::Application(format!("invalid image payload: {}", e)))?;

    let path = std::env::temp_dir().join(format!(
        "pixelmark_ai_{}.{}",
        unix_millis(),
        extension_for(header)
    ));
    fs::write(&path, bytes).map_err(|e| Error::FileWrite {
        path: path.clone(),
        source: e,
    })?;
    debug!("Wrote generated image to {}", path.display());
    Ok(path)
}

fn extension_for(data_url_header: &str) -> &'static str {
    match data_url_header.trim_start_matches("data:") {
        m if m.starts_with("image/jpeg") => "jpg",
        m if m.starts_with("image/webp") => "webp",
        m if m.starts_with("image/gif") => "gif",
        _ => "png",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("编辑器配置文件.json");

        let mut settings = Settings::default();
        settings.editor.font_size = 18.0;
        export_settings(&path, &settings).unwrap();

        let imported = import_settings(&path).unwrap();
        assert_eq!(imported.editor.font_size, 18.0);
    }

    #[test]
    fn test_import_settings_sanitizes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        // Font size far out of range must come back clamped, not rejected
        fs::write(
            &path,
            r#"{"editor": {"font_size": 500.0}}"#,
        )
        .unwrap();

        let imported = import_settings(&path).unwrap();
        assert_eq!(imported.editor.font_size, Settings::MAX_FONT_SIZE);
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        assert!(import_settings(&path).is_err());
        assert!(import_user_data(&path).is_err());
    }

    #[test]
    fn test_import_missing_file() {
        let err = import_user_data(Path::new("/nonexistent/没有.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad { .. }));
    }

    #[test]
    fn test_user_data_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("用户数据备份.json");

        let mut data = UserData::default();
        data.save_draft("# 备份内容", 1_700_000_000_000);
        export_user_data(&path, &data).unwrap();

        let imported = import_user_data(&path).unwrap();
        assert_eq!(imported.drafts.len(), data.drafts.len());
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for("data:image/png"), "png");
        assert_eq!(extension_for("data:image/jpeg"), "jpg");
        assert_eq!(extension_for("data:image/webp"), "webp");
        assert_eq!(extension_for("data:application/octet-stream"), "png");
    }

    #[test]
    fn test_write_temp_image_decodes_payload() {
        // 1x1 transparent PNG
        let url = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
        let path = write_temp_image(url).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_write_temp_image_rejects_plain_url() {
        assert!(write_temp_image("https://example.com/a.png").is_err());
    }
}
