//! AI request profiles
//!
//! A profile bundles everything one request needs: provider, credentials,
//! endpoint override, model names, temperature. The app keeps two of them
//! (chat and image) so users can point text and drawing at different
//! providers or keys.

use serde::{Deserialize, Serialize};

/// Fallback chat model when an OpenAI profile leaves the field blank.
pub const OPENAI_DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Fallback image model when an OpenAI profile leaves the field blank.
pub const OPENAI_DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Fallback chat model when a Gemini profile leaves the field blank.
pub const GEMINI_DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";

/// Fallback image model when a Gemini profile leaves the field blank.
pub const GEMINI_DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Base endpoint for OpenAI-compatible providers.
pub const OPENAI_DEFAULT_BASE: &str = "https://api.openai.com/v1";

/// Base endpoint for the Gemini REST API.
pub const GEMINI_DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI 兼容",
            Provider::Gemini => "Gemini",
        }
    }

    pub fn all() -> [Provider; 2] {
        [Provider::Gemini, Provider::OpenAi]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiProfile {
    pub provider: Provider,
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub temperature: f32,
}

impl Default for AiProfile {
    fn default() -> Self {
        Self::default_chat()
    }
}

impl AiProfile {
    /// The shipped chat profile: Gemini, fast text model.
    pub fn default_chat() -> Self {
        Self {
            provider: Provider::Gemini,
            api_key: String::new(),
            base_url: String::new(),
            chat_model: "gemini-3-flash-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            temperature: 0.7,
        }
    }

    /// The shipped image profile: Gemini, Imagen model.
    pub fn default_image() -> Self {
        Self {
            chat_model: String::new(),
            image_model: "imagen-4.0-generate-001".to_string(),
            ..Self::default_chat()
        }
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Chat model with the provider's fallback applied.
    pub fn chat_model_or_default(&self) -> &str {
        if !self.chat_model.trim().is_empty() {
            return &self.chat_model;
        }
        match self.provider {
            Provider::OpenAi => OPENAI_DEFAULT_CHAT_MODEL,
            Provider::Gemini => GEMINI_DEFAULT_CHAT_MODEL,
        }
    }

    /// Image model with the provider's fallback applied.
    pub fn image_model_or_default(&self) -> &str {
        if !self.image_model.trim().is_empty() {
            return &self.image_model;
        }
        match self.provider {
            Provider::OpenAi => OPENAI_DEFAULT_IMAGE_MODEL,
            Provider::Gemini => GEMINI_DEFAULT_IMAGE_MODEL,
        }
    }

    /// Endpoint base with the provider default applied and any trailing
    /// slash removed, ready for path concatenation.
    pub fn base_url_or_default(&self) -> String {
        let base = self.base_url.trim();
        if base.is_empty() {
            let default = match self.provider {
                Provider::OpenAi => OPENAI_DEFAULT_BASE,
                Provider::Gemini => GEMINI_DEFAULT_BASE,
            };
            return default.to_string();
        }
        base.trim_end_matches('/').to_string()
    }
}

/// Aspect ratios offered by the drawing panel. OpenAI image endpoints take
/// pixel sizes, Gemini takes ratio strings; both mappings live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    Square,
    Wide,
    Standard,
}

impl ImageSize {
    pub fn all() -> [ImageSize; 3] {
        [ImageSize::Square, ImageSize::Wide, ImageSize::Standard]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024 (方形 - 通用)",
            ImageSize::Wide => "16:9 (横版 - 视频/封面)",
            ImageSize::Standard => "4:3 (标准 - 插图)",
        }
    }

    /// Size string for OpenAI image generation. Only DALL·E's square and
    /// wide sizes exist; 4:3 rounds to square.
    pub fn openai_size(&self) -> &'static str {
        match self {
            ImageSize::Square | ImageSize::Standard => "1024x1024",
            ImageSize::Wide => "1792x1024",
        }
    }

    /// Aspect-ratio string for Gemini image generation.
    pub fn aspect_ratio(&self) -> &'static str {
        match self {
            ImageSize::Square => "1:1",
            ImageSize::Wide => "16:9",
            ImageSize::Standard => "4:3",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_fallbacks_per_provider() {
        let mut profile = AiProfile::default_chat();
        profile.chat_model = String::new();
        profile.image_model = "  ".to_string();
        assert_eq!(profile.chat_model_or_default(), GEMINI_DEFAULT_CHAT_MODEL);
        assert_eq!(profile.image_model_or_default(), GEMINI_DEFAULT_IMAGE_MODEL);

        profile.provider = Provider::OpenAi;
        assert_eq!(profile.chat_model_or_default(), OPENAI_DEFAULT_CHAT_MODEL);
        assert_eq!(profile.image_model_or_default(), OPENAI_DEFAULT_IMAGE_MODEL);

        profile.chat_model = "gpt-4o".to_string();
        assert_eq!(profile.chat_model_or_default(), "gpt-4o");
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let mut profile = AiProfile::default_chat();
        profile.provider = Provider::OpenAi;
        assert_eq!(profile.base_url_or_default(), OPENAI_DEFAULT_BASE);

        profile.base_url = "https://proxy.example.com/v1/".to_string();
        assert_eq!(profile.base_url_or_default(), "https://proxy.example.com/v1");
    }

    #[test]
    fn test_provider_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Provider::OpenAi).unwrap(),
            "\"openai\""
        );
        let parsed: Provider = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(parsed, Provider::Gemini);
    }

    #[test]
    fn test_profile_deserializes_with_missing_fields() {
        let profile: AiProfile = serde_json::from_str("{\"provider\":\"openai\"}").unwrap();
        assert_eq!(profile.provider, Provider::OpenAi);
        assert!(!profile.has_key());
        assert_eq!(profile.temperature, 0.7);
    }

    #[test]
    fn test_openai_size_mapping() {
        assert_eq!(ImageSize::Square.openai_size(), "1024x1024");
        assert_eq!(ImageSize::Wide.openai_size(), "1792x1024");
        assert_eq!(ImageSize::Standard.openai_size(), "1024x1024");
        assert_eq!(ImageSize::Standard.aspect_ratio(), "4:3");
    }
}
