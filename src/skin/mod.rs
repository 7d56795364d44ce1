//! Preview skin catalog
//!
//! A skin is a CSS stylesheet scoped to `#preview-root`; it drives both the
//! live preview and the inlined styles of the clipboard export. The catalog
//! holds the eight stock skins plus any user-created ones. Custom skins are
//! persisted through user data; built-ins are seeded at construction and
//! can never be deleted, which keeps the fallback in [`SkinLibrary::active`]
//! total.

mod builtin;

pub use builtin::built_in_skins;

use serde::{Deserialize, Serialize};

/// One preview skin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    pub id: String,
    pub name: String,
    pub css: String,
    #[serde(default)]
    pub built_in: bool,
    #[serde(default)]
    pub favorite: bool,
}

impl Skin {
    /// A custom skin with user-authored CSS.
    pub fn custom(name: impl Into<String>, css: impl Into<String>, now_ms: u64) -> Self {
        Self {
            id: format!("custom-{now_ms}"),
            name: name.into(),
            css: css.into(),
            built_in: false,
            favorite: false,
        }
    }

    /// A custom skin produced by AI generation, named after the prompt.
    pub fn ai_generated(prompt: &str, css: impl Into<String>, now_ms: u64) -> Self {
        let short: String = prompt.chars().take(10).collect();
        Self::custom(format!("AI: {short}..."), css, now_ms)
    }
}

/// The full skin catalog: stock skins plus the user's custom ones.
#[derive(Debug, Clone)]
pub struct SkinLibrary {
    skins: Vec<Skin>,
}

impl Default for SkinLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinLibrary {
    pub fn new() -> Self {
        Self {
            skins: built_in_skins(),
        }
    }

    /// Rebuild the catalog from persisted custom skins. Built-ins are
    /// re-seeded from the stock definitions so their CSS always tracks the
    /// current release; only the favorite flag survives from storage.
    pub fn with_custom(custom: Vec<Skin>, favorite_builtins: &[String]) -> Self {
        let mut library = Self::new();
        for skin in &mut library.skins {
            if favorite_builtins.iter().any(|id| *id == skin.id) {
                skin.favorite = true;
            }
        }
        library
            .skins
            .extend(custom.into_iter().filter(|s| !s.built_in));
        library
    }

    /// Custom skins in insertion order, for persistence.
    pub fn custom_skins(&self) -> Vec<Skin> {
        self.skins.iter().filter(|s| !s.built_in).cloned().collect()
    }

    /// Ids of favorited built-ins, for persistence.
    pub fn favorite_builtin_ids(&self) -> Vec<String> {
        self.skins
            .iter()
            .filter(|s| s.built_in && s.favorite)
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Skin> {
        self.skins.iter().find(|s| s.id == id)
    }

    /// The skin currently in effect for `id`. A stale id (a deleted custom
    /// skin, or one from a newer release) falls back to the first built-in.
    pub fn active(&self, id: &str) -> &Skin {
        if let Some(skin) = self.skins.iter().find(|s| s.id == id) {
            return skin;
        }
        // Built-ins are seeded at construction and cannot be removed.
        &self.skins[0]
    }

    pub fn add(&mut self, skin: Skin) {
        self.skins.push(skin);
    }

    /// Delete a custom skin. Built-ins and unknown ids are refused.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.skins.iter().position(|s| s.id == id) else {
            return false;
        };
        if self.skins[pos].built_in {
            return false;
        }
        self.skins.remove(pos);
        true
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.skins.iter_mut().find(|s| s.id == id) {
            Some(skin) => {
                skin.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_css(&mut self, id: &str, css: &str) -> bool {
        match self.skins.iter_mut().find(|s| s.id == id) {
            Some(skin) => {
                skin.css = css.to_string();
                true
            }
            None => false,
        }
    }

    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        match self.skins.iter_mut().find(|s| s.id == id) {
            Some(skin) => {
                skin.favorite = !skin.favorite;
                true
            }
            None => false,
        }
    }

    /// Display order for the skin dialog: favorites first, then custom
    /// skins, then stock skins, each group in catalog order.
    pub fn sorted(&self) -> Vec<&Skin> {
        let mut skins: Vec<&Skin> = self.skins.iter().collect();
        skins.sort_by_key(|s| (!s.favorite, s.built_in));
        skins
    }

    pub fn built_in_count(&self) -> usize {
        self.skins.iter().filter(|s| s.built_in).count()
    }

    pub fn custom_count(&self) -> usize {
        self.skins.iter().filter(|s| !s.built_in).count()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_catalog() {
        let library = SkinLibrary::new();
        assert_eq!(library.built_in_count(), 8);
        assert_eq!(library.custom_count(), 0);

        let ids: Vec<&str> = library.sorted().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            ["pixel", "dark", "green", "tech", "retro", "pink", "gray", "blue"]
        );
    }

    #[test]
    fn test_pink_skin_carries_heading_decoration() {
        let library = SkinLibrary::new();
        let pink = library.get("pink").unwrap();
        assert!(pink.css.contains("h2::before { content: '🌸'; }"));
    }

    #[test]
    fn test_active_falls_back_to_first_builtin() {
        let library = SkinLibrary::new();
        assert_eq!(library.active("dark").id, "dark");
        assert_eq!(library.active("custom-123").id, "pixel");
        assert_eq!(library.active("").id, "pixel");
    }

    #[test]
    fn test_builtins_are_not_deletable() {
        let mut library = SkinLibrary::new();
        assert!(!library.remove("pixel"));
        assert_eq!(library.built_in_count(), 8);
    }

    #[test]
    fn test_custom_skin_lifecycle() {
        let mut library = SkinLibrary::new();
        library.add(Skin::custom("我的主题", "#preview-root { color: red; }", 42));
        assert_eq!(library.custom_count(), 1);
        assert_eq!(library.active("custom-42").name, "我的主题");

        assert!(library.rename("custom-42", "改名"));
        assert!(library.set_css("custom-42", "#preview-root { color: blue; }"));
        let skin = library.get("custom-42").unwrap();
        assert_eq!(skin.name, "改名");
        assert!(skin.css.contains("blue"));

        assert!(library.remove("custom-42"));
        assert_eq!(library.custom_count(), 0);
        assert!(!library.remove("custom-42"));
    }

    #[test]
    fn test_ai_skin_name_truncates_prompt() {
        let skin = Skin::ai_generated(
            "科技感十足的深蓝色杂志排版风格",
            "#preview-root {}",
            1700000000000,
        );
        assert_eq!(skin.id, "custom-1700000000000");
        assert_eq!(skin.name, "AI: 科技感十足的深蓝色杂...");
        assert!(!skin.built_in);
        assert!(!skin.favorite);
    }

    #[test]
    fn test_ai_skin_name_keeps_short_prompt_whole() {
        let skin = Skin::ai_generated("复古风", "", 1);
        assert_eq!(skin.name, "AI: 复古风...");
    }

    #[test]
    fn test_sorted_puts_favorites_then_custom_first() {
        let mut library = SkinLibrary::new();
        library.add(Skin::custom("c1", "", 1));
        library.add(Skin::custom("c2", "", 2));
        library.toggle_favorite("retro");
        library.toggle_favorite("custom-2");

        let ids: Vec<&str> = library.sorted().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "custom-2", "retro", // favorites, custom before built-in
                "custom-1", // remaining custom
                "pixel", "dark", "green", "tech", "pink", "gray", "blue"
            ]
        );
    }

    #[test]
    fn test_rebuild_keeps_custom_and_builtin_favorites() {
        let mut library = SkinLibrary::new();
        library.add(Skin::custom("mine", "#preview-root {}", 7));
        library.toggle_favorite("dark");
        library.toggle_favorite("custom-7");

        let rebuilt = SkinLibrary::with_custom(
            library.custom_skins(),
            &library.favorite_builtin_ids(),
        );
        assert_eq!(rebuilt.built_in_count(), 8);
        assert_eq!(rebuilt.custom_count(), 1);
        assert!(rebuilt.get("dark").unwrap().favorite);
        assert!(rebuilt.get("custom-7").unwrap().favorite);
        assert!(!rebuilt.get("pixel").unwrap().favorite);
    }

    #[test]
    fn test_rebuild_drops_forged_builtin_flag() {
        // A tampered user-data file cannot shadow a stock skin.
        let forged = Skin {
            id: "pixel".to_string(),
            name: "fake".to_string(),
            css: String::new(),
            built_in: true,
            favorite: false,
        };
        let rebuilt = SkinLibrary::with_custom(vec![forged], &[]);
        assert_eq!(rebuilt.built_in_count(), 8);
        assert_eq!(rebuilt.get("pixel").unwrap().name, "简约像素风");
    }
}
