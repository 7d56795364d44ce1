//! Persisted user data: article content, drafts, custom skins, snippets and
//! AI history. Serialized as `userdata.json` next to the settings file.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ai::ChatRole;
use crate::skin::Skin;
use crate::snippets::SnippetLibrary;

/// Starter article shown on first launch.
pub const DEFAULT_MARKDOWN: &str = r#"# 欢迎使用公众号编辑器

这是一个**极致像素风**的编辑器。

## 功能介绍

1. **实时预览**：左侧编辑，右侧实时显示公众号排版。
2. **AI助手**：点击上方“AI助手”，支持文章润色与AI绘图。
3. **一键复制**：点击右上角，直接复制为公众号兼容格式。
4. **主题库**：内置8款+主题，支持拖拽排序与AI定制。
5. **片段库**：右键点击编辑区，或点击上方“常用片段”，快速插入重复文案。

> 提示：配置您的 API Key 后即可使用强大的 AI 功能。

试试插入图片：

![示例图片](https://picsum.photos/600/300)"#;

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// A saved article draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    /// Save time in milliseconds since the Unix epoch
    pub saved_at: u64,
    pub content: String,
}

impl Draft {
    /// Derive a display label from the draft content: the first non-blank
    /// line, heading markers stripped, truncated for list display.
    pub fn title(&self) -> String {
        let line = self
            .content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("(空白草稿)");
        let text = line.trim_start_matches('#').trim_start();
        let mut title: String = text.chars().take(20).collect();
        if text.chars().count() > 20 {
            title.push('…');
        }
        if title.is_empty() {
            String::from("(空白草稿)")
        } else {
            title
        }
    }
}

/// One message in the AI chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    /// Send time in milliseconds since the Unix epoch
    pub timestamp: u64,
}

/// A generated image kept in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    /// Data URL or remote URL of the image
    pub url: String,
    pub prompt: String,
    /// Generation time in milliseconds since the Unix epoch
    pub timestamp: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// UserData
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the user has produced, persisted separately from settings so a
/// settings reset never touches article data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    /// Current editor content
    pub content: String,

    /// Saved drafts, most recent first
    pub drafts: Vec<Draft>,

    /// User-created skins (built-ins are never stored)
    pub custom_skins: Vec<Skin>,

    /// Ids of favorited built-in skins
    pub favorite_skins: Vec<String>,

    /// Snippet library (defaults on first launch)
    pub snippets: SnippetLibrary,

    /// AI chat history, oldest first
    pub chat_history: Vec<ChatMessage>,

    /// Generated image history, most recent first
    pub image_history: Vec<GeneratedImage>,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            content: String::from(DEFAULT_MARKDOWN),
            drafts: Vec::new(),
            custom_skins: Vec::new(),
            favorite_skins: Vec::new(),
            snippets: SnippetLibrary::default(),
            chat_history: Vec::new(),
            image_history: Vec::new(),
        }
    }
}

impl UserData {
    /// Maximum number of drafts kept.
    pub const MAX_DRAFTS: usize = 30;
    /// Maximum number of chat messages kept.
    pub const MAX_CHAT_HISTORY: usize = 200;
    /// Maximum number of generated images kept.
    pub const MAX_IMAGE_HISTORY: usize = 50;

    /// Save the current content as a new draft at the front of the list.
    pub fn save_draft(&mut self, content: &str, now_ms: u64) {
        self.drafts.insert(
            0,
            Draft {
                id: now_ms.to_string(),
                saved_at: now_ms,
                content: String::from(content),
            },
        );
        self.drafts.truncate(Self::MAX_DRAFTS);
    }

    /// Look up a draft by id.
    pub fn draft(&self, id: &str) -> Option<&Draft> {
        self.drafts.iter().find(|d| d.id == id)
    }

    /// Delete a draft by id.
    pub fn delete_draft(&mut self, id: &str) {
        self.drafts.retain(|d| d.id != id);
    }

    /// Append a chat message and return its id.
    pub fn push_chat(&mut self, role: ChatRole, text: impl Into<String>, now_ms: u64) -> String {
        let id = now_ms.to_string();
        self.chat_history.push(ChatMessage {
            id: id.clone(),
            role,
            text: text.into(),
            timestamp: now_ms,
        });
        if self.chat_history.len() > Self::MAX_CHAT_HISTORY {
            let excess = self.chat_history.len() - Self::MAX_CHAT_HISTORY;
            self.chat_history.drain(..excess);
        }
        id
    }

    /// Record a generated image at the front of the history.
    pub fn push_image(&mut self, url: impl Into<String>, prompt: impl Into<String>, now_ms: u64) {
        self.image_history.insert(
            0,
            GeneratedImage {
                id: now_ms.to_string(),
                url: url.into(),
                prompt: prompt.into(),
                timestamp: now_ms,
            },
        );
        self.image_history.truncate(Self::MAX_IMAGE_HISTORY);
    }

    /// Cap list lengths after loading data that might have been hand-edited.
    pub fn sanitize(&mut self) {
        self.drafts.truncate(Self::MAX_DRAFTS);
        if self.chat_history.len() > Self::MAX_CHAT_HISTORY {
            let excess = self.chat_history.len() - Self::MAX_CHAT_HISTORY;
            self.chat_history.drain(..excess);
        }
        self.image_history.truncate(Self::MAX_IMAGE_HISTORY);
    }

    /// Deserialize and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut data: Self = serde_json::from_str(json)?;
        data.sanitize();
        Ok(data)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
