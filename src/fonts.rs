//! Font setup for PixelMark
//!
//! The editor ships no font files of its own. Chinese glyph coverage comes
//! from whichever CJK font the host system provides: well-known font paths
//! are probed at startup and the first readable file is registered as a
//! fallback for both egui font families. Without a candidate the app stays
//! usable but renders CJK text as replacement glyphs.

use egui::{FontData, FontDefinitions, FontFamily, FontId, TextStyle};
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name under which the discovered system font is registered.
const SYSTEM_CJK_FONT: &str = "system-cjk";

/// Candidate font files, most preferred first.
fn cjk_font_candidates() -> Vec<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        vec![
            // 微软雅黑, then 黑体 / 宋体
            PathBuf::from(r"C:\Windows\Fonts\msyh.ttc"),
            PathBuf::from(r"C:\Windows\Fonts\msyh.ttf"),
            PathBuf::from(r"C:\Windows\Fonts\simhei.ttf"),
            PathBuf::from(r"C:\Windows\Fonts\simsun.ttc"),
        ]
    }
    #[cfg(target_os = "macos")]
    {
        vec![
            PathBuf::from("/System/Library/Fonts/PingFang.ttc"),
            PathBuf::from("/System/Library/Fonts/STHeiti Light.ttc"),
            PathBuf::from("/System/Library/Fonts/Supplemental/Songti.ttc"),
        ]
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        vec![
            PathBuf::from("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc"),
            PathBuf::from("/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc"),
            PathBuf::from(
                "/usr/share/fonts/opentype/source-han-sans/SourceHanSansSC-Regular.otf",
            ),
            PathBuf::from("/usr/share/fonts/truetype/wqy/wqy-microhei.ttc"),
            PathBuf::from("/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc"),
        ]
    }
}

/// Read the first candidate that exists.
fn load_system_cjk_font() -> Option<(PathBuf, Vec<u8>)> {
    for path in cjk_font_candidates() {
        match std::fs::read(&path) {
            Ok(bytes) => return Some((path, bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => warn!("Failed to read font {}: {}", path.display(), err),
        }
    }
    None
}

/// Create font definitions with the system CJK font appended as a fallback.
pub fn create_font_definitions() -> FontDefinitions {
    let mut fonts = FontDefinitions::default();

    match load_system_cjk_font() {
        Some((path, bytes)) => {
            fonts
                .font_data
                .insert(SYSTEM_CJK_FONT.to_owned(), FontData::from_owned(bytes));

            // Appended after egui's defaults: Latin text keeps its metrics,
            // CJK glyphs resolve through the system font.
            for family in [FontFamily::Proportional, FontFamily::Monospace] {
                fonts
                    .families
                    .entry(family)
                    .or_default()
                    .push(SYSTEM_CJK_FONT.to_owned());
            }

            info!("Loaded system CJK font: {}", path.display());
        }
        None => {
            warn!("No system CJK font found; Chinese text will not render correctly");
        }
    }

    fonts
}

/// Apply fonts and text styles to an egui context.
///
/// This should be called once during application initialization.
pub fn setup_fonts(ctx: &egui::Context) {
    ctx.set_fonts(create_font_definitions());

    let text_styles: BTreeMap<TextStyle, FontId> = [
        (
            TextStyle::Heading,
            FontId::new(20.0, FontFamily::Proportional),
        ),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (
            TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        ),
        (
            TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        ),
        (
            TextStyle::Small,
            FontId::new(11.0, FontFamily::Proportional),
        ),
    ]
    .into();

    ctx.style_mut(|style| {
        style.text_styles = text_styles.clone();
    });

    info!("Configured egui text styles");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_are_absolute() {
        let candidates = cjk_font_candidates();
        assert!(!candidates.is_empty());
        for path in candidates {
            assert!(path.is_absolute(), "{} is not absolute", path.display());
        }
    }

    #[test]
    fn test_font_definitions_keep_defaults() {
        let fonts = create_font_definitions();
        let proportional = &fonts.families[&FontFamily::Proportional];
        let monospace = &fonts.families[&FontFamily::Monospace];
        assert!(!proportional.is_empty());
        assert!(!monospace.is_empty());

        // The system font, when present, is appended as a fallback and never
        // displaces egui's bundled Latin faces.
        if fonts.font_data.contains_key(SYSTEM_CJK_FONT) {
            assert_ne!(proportional[0], SYSTEM_CJK_FONT);
            assert_eq!(
                proportional.last().map(String::as_str),
                Some(SYSTEM_CJK_FONT)
            );
            assert_eq!(monospace.last().map(String::as_str), Some(SYSTEM_CJK_FONT));
        }
    }
}
