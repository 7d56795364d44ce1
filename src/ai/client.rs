//! Provider wire clients
//!
//! Blocking HTTP against two provider families: OpenAI-compatible endpoints
//! (bearer-auth JSON under `{base}/chat/completions` and
//! `{base}/images/generations`) and the Gemini REST API
//! (`{base}/v1beta/models/{model}:generateContent` with the key as a query
//! parameter, plus `:predict` for Imagen models). Request bodies and
//! response extraction are plain functions over `serde_json::Value` so the
//! wire format is testable without a server; [`AiClient`] adds transport.
//!
//! Every operation checks for an API key before any I/O, so a blank
//! configuration fails in microseconds instead of timing out.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use serde_json::{json, Value};

use crate::ai::profile::{AiProfile, ImageSize, Provider};
use crate::ai::prompts::{skin_css_system_prompt, AUTO_LAYOUT_SYSTEM_PROMPT, CHAT_SYSTEM_PROMPT};
use crate::ai::ChatRole;
use crate::error::{Error, Result};

/// Layout rewrites must stay close to the source text.
const AUTO_LAYOUT_TEMPERATURE: f32 = 0.3;

/// Image generation regularly runs past a minute.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

pub struct AiClient {
    http: Client,
}

impl AiClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::AiRequest(e.to_string()))?;
        Ok(Self { http })
    }

    /// One conversational turn, with prior history replayed.
    pub fn chat(
        &self,
        profile: &AiProfile,
        prompt: &str,
        history: &[(ChatRole, String)],
    ) -> Result<String> {
        require_key(profile, "请先在设置中配置 Chat API Key")?;
        match profile.provider {
            Provider::OpenAi => {
                let body = openai_chat_body(
                    profile.chat_model_or_default(),
                    CHAT_SYSTEM_PROMPT,
                    history,
                    prompt,
                    profile.temperature,
                );
                let value = self.post_openai(profile, "/chat/completions", &body)?;
                Ok(extract_openai_chat(&value)
                    .unwrap_or_else(|| "AI returned empty response".to_string()))
            }
            Provider::Gemini => {
                let body = gemini_text_body(
                    &flatten_history(history, prompt),
                    CHAT_SYSTEM_PROMPT,
                    profile.temperature,
                );
                let value = self.post_gemini(
                    profile,
                    profile.chat_model_or_default(),
                    "generateContent",
                    &body,
                )?;
                Ok(extract_gemini_text(&value).unwrap_or_else(|| "AI 未返回内容".to_string()))
            }
        }
    }

    /// Rewrite the whole article's markdown structure. An empty reply keeps
    /// the original content rather than blanking the editor.
    pub fn auto_layout(&self, profile: &AiProfile, content: &str) -> Result<String> {
        require_key(profile, "请先配置 Chat API Key")?;
        match profile.provider {
            Provider::OpenAi => {
                let body = openai_chat_body(
                    profile.chat_model_or_default(),
                    AUTO_LAYOUT_SYSTEM_PROMPT,
                    &[],
                    content,
                    AUTO_LAYOUT_TEMPERATURE,
                );
                let value = self.post_openai(profile, "/chat/completions", &body)?;
                Ok(extract_openai_chat(&value).unwrap_or_else(|| content.to_string()))
            }
            Provider::Gemini => {
                let body =
                    gemini_text_body(content, AUTO_LAYOUT_SYSTEM_PROMPT, AUTO_LAYOUT_TEMPERATURE);
                let value = self.post_gemini(
                    profile,
                    profile.chat_model_or_default(),
                    "generateContent",
                    &body,
                )?;
                Ok(extract_gemini_text(&value).unwrap_or_else(|| content.to_string()))
            }
        }
    }

    /// Generate one image; the result is a `data:` URL when the provider
    /// returns bytes, otherwise a remote URL.
    pub fn generate_image(
        &self,
        profile: &AiProfile,
        prompt: &str,
        size: ImageSize,
    ) -> Result<String> {
        require_key(profile, "请先在设置中配置 绘图 API Key")?;
        let no_image = || Error::AiRequest("未生成图片".to_string());
        match profile.provider {
            Provider::OpenAi => {
                let body = openai_image_body(profile.image_model_or_default(), prompt, size);
                let value = self.post_openai(profile, "/images/generations", &body)?;
                extract_openai_image(&value).ok_or_else(no_image)
            }
            Provider::Gemini => {
                let model = profile.image_model_or_default();
                if model.to_lowercase().contains("imagen") {
                    let body = imagen_predict_body(prompt, size);
                    let value = self.post_gemini(profile, model, "predict", &body)?;
                    extract_imagen_image(&value).ok_or_else(no_image)
                } else {
                    let body = gemini_image_body(prompt, size);
                    let value = self.post_gemini(profile, model, "generateContent", &body)?;
                    extract_gemini_image(&value).ok_or_else(no_image)
                }
            }
        }
    }

    /// Generate skin CSS from a style description. Code-fence markers are
    /// stripped so the result drops straight into a stylesheet field.
    pub fn generate_skin_css(&self, profile: &AiProfile, description: &str) -> Result<String> {
        require_key(profile, "请先配置 Chat API Key 以生成主题")?;
        let system = skin_css_system_prompt(description);
        let raw = match profile.provider {
            Provider::OpenAi => {
                let body = openai_chat_body(
                    profile.chat_model_or_default(),
                    &system,
                    &[],
                    description,
                    profile.temperature,
                );
                let value = self.post_openai(profile, "/chat/completions", &body)?;
                extract_openai_chat(&value).unwrap_or_default()
            }
            Provider::Gemini => {
                let body = gemini_text_body(description, &system, profile.temperature);
                let value = self.post_gemini(
                    profile,
                    profile.chat_model_or_default(),
                    "generateContent",
                    &body,
                )?;
                extract_gemini_text(&value).unwrap_or_default()
            }
        };
        Ok(strip_css_fences(&raw))
    }

    fn post_openai(&self, profile: &AiProfile, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", profile.base_url_or_default(), path);
        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .bearer_auth(profile.api_key.trim())
            .json(body)
            .send()
            .map_err(|e| Error::AiRequest(e.to_string()))?;
        read_json_response(response, "OpenAI")
    }

    fn post_gemini(
        &self,
        profile: &AiProfile,
        model: &str,
        action: &str,
        body: &Value,
    ) -> Result<Value> {
        let url = format!(
            "{}/v1beta/models/{}:{}",
            profile.base_url_or_default(),
            model,
            action
        );
        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .query(&[("key", profile.api_key.trim())])
            .json(body)
            .send()
            .map_err(|e| Error::AiRequest(e.to_string()))?;
        read_json_response(response, "Gemini")
    }
}

fn require_key(profile: &AiProfile, message: &str) -> Result<()> {
    if profile.has_key() {
        Ok(())
    } else {
        Err(Error::AiConfig(message.to_string()))
    }
}

/// Surface the provider's own error message where it sends one; fall back
/// to the HTTP status otherwise.
fn read_json_response(response: Response, provider: &str) -> Result<Value> {
    let status = response.status();
    let text = response.text().map_err(|e| Error::AiRequest(e.to_string()))?;
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("{provider} Request Failed: {}", status.as_u16()));
        warn!("AI request rejected: {message}");
        return Err(Error::AiRequest(message));
    }
    serde_json::from_str(&text).map_err(|e| Error::AiRequest(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────────────────────────

fn openai_chat_body(
    model: &str,
    system: &str,
    history: &[(ChatRole, String)],
    prompt: &str,
    temperature: f32,
) -> Value {
    let mut messages = vec![json!({"role": "system", "content": system})];
    for (role, text) in history {
        let role = match role {
            ChatRole::User => "user",
            ChatRole::Model => "assistant",
        };
        messages.push(json!({"role": role, "content": text}));
    }
    messages.push(json!({"role": "user", "content": prompt}));
    json!({"model": model, "messages": messages, "temperature": temperature})
}

/// Gemini gets the conversation as one flattened transcript ending with the
/// new prompt.
fn flatten_history(history: &[(ChatRole, String)], prompt: &str) -> String {
    let mut context = String::new();
    for (role, text) in history {
        let speaker = match role {
            ChatRole::User => "User",
            ChatRole::Model => "Model",
        };
        context.push_str(&format!("{speaker}: {text}\n"));
    }
    context.push_str(&format!("User: {prompt}"));
    context
}

fn gemini_text_body(contents: &str, system: &str, temperature: f32) -> Value {
    json!({
        "contents": [{"parts": [{"text": contents}]}],
        "systemInstruction": {"parts": [{"text": system}]},
        "generationConfig": {"temperature": temperature},
    })
}

fn gemini_image_body(prompt: &str, size: ImageSize) -> Value {
    json!({
        "contents": [{"parts": [{"text": prompt}]}],
        "generationConfig": {"imageConfig": {"aspectRatio": size.aspect_ratio()}},
    })
}

fn imagen_predict_body(prompt: &str, size: ImageSize) -> Value {
    json!({
        "instances": [{"prompt": prompt}],
        "parameters": {
            "sampleCount": 1,
            "aspectRatio": size.aspect_ratio(),
            "outputMimeType": "image/jpeg",
        },
    })
}

fn openai_image_body(model: &str, prompt: &str, size: ImageSize) -> Value {
    json!({
        "model": model,
        "prompt": prompt,
        "n": 1,
        "size": size.openai_size(),
        "response_format": "b64_json",
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Response extraction
// ─────────────────────────────────────────────────────────────────────────────

fn extract_openai_chat(value: &Value) -> Option<String> {
    let content = value.pointer("/choices/0/message/content")?.as_str()?;
    if content.is_empty() {
        return None;
    }
    Some(content.to_string())
}

/// All text parts of the first candidate, concatenated.
fn extract_gemini_text(value: &Value) -> Option<String> {
    let parts = value.pointer("/candidates/0/content/parts")?.as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        return None;
    }
    Some(text)
}

/// Inline bytes are preferred over a short-lived remote URL.
fn extract_openai_image(value: &Value) -> Option<String> {
    if let Some(b64) = value.pointer("/data/0/b64_json").and_then(Value::as_str) {
        if !b64.is_empty() {
            return Some(format!("data:image/png;base64,{b64}"));
        }
    }
    value
        .pointer("/data/0/url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

fn extract_gemini_image(value: &Value) -> Option<String> {
    let parts = value.pointer("/candidates/0/content/parts")?.as_array()?;
    for part in parts {
        let Some(inline) = part.get("inlineData") else {
            continue;
        };
        let Some(data) = inline.get("data").and_then(Value::as_str) else {
            continue;
        };
        let mime = inline
            .get("mimeType")
            .and_then(Value::as_str)
            .unwrap_or("image/png");
        return Some(format!("data:{mime};base64,{data}"));
    }
    None
}

fn extract_imagen_image(value: &Value) -> Option<String> {
    let b64 = value
        .pointer("/predictions/0/bytesBase64Encoded")?
        .as_str()?;
    if b64.is_empty() {
        return None;
    }
    Some(format!("data:image/jpeg;base64,{b64}"))
}

fn strip_css_fences(css: &str) -> String {
    css.replace("```css", "").replace("```", "").trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn keyless() -> AiProfile {
        AiProfile::default_chat()
    }

    #[test]
    fn test_missing_key_fails_before_any_io() {
        let client = AiClient::new().unwrap();
        let err = client.chat(&keyless(), "hi", &[]).unwrap_err();
        assert!(matches!(err, Error::AiConfig(_)));
        assert_eq!(err.to_string(), "请先在设置中配置 Chat API Key");

        let err = client.auto_layout(&keyless(), "text").unwrap_err();
        assert_eq!(err.to_string(), "请先配置 Chat API Key");

        let err = client
            .generate_image(&keyless(), "a cat", ImageSize::Square)
            .unwrap_err();
        assert_eq!(err.to_string(), "请先在设置中配置 绘图 API Key");

        let err = client.generate_skin_css(&keyless(), "复古").unwrap_err();
        assert_eq!(err.to_string(), "请先配置 Chat API Key 以生成主题");
    }

    #[test]
    fn test_openai_chat_body_shape() {
        let history = vec![
            (ChatRole::User, "你好".to_string()),
            (ChatRole::Model, "你好，有什么可以帮你？".to_string()),
        ];
        let body = openai_chat_body("gpt-4o", "system text", &history, "润色这段", 0.7);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], 0.7);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[3], json!({"role": "user", "content": "润色这段"}));
    }

    #[test]
    fn test_gemini_history_is_flattened() {
        let history = vec![
            (ChatRole::User, "第一问".to_string()),
            (ChatRole::Model, "第一答".to_string()),
        ];
        assert_eq!(
            flatten_history(&history, "第二问"),
            "User: 第一问\nModel: 第一答\nUser: 第二问"
        );
        assert_eq!(flatten_history(&[], "只有提问"), "User: 只有提问");
    }

    #[test]
    fn test_gemini_text_body_shape() {
        let body = gemini_text_body("正文", "系统指令", 0.3);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "正文");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "系统指令");
        assert_eq!(body["generationConfig"]["temperature"], 0.3);
    }

    #[test]
    fn test_openai_image_body_requests_base64() {
        let body = openai_image_body("dall-e-3", "像素风封面", ImageSize::Wide);
        assert_eq!(body["size"], "1792x1024");
        assert_eq!(body["n"], 1);
        assert_eq!(body["response_format"], "b64_json");
    }

    #[test]
    fn test_imagen_predict_body_shape() {
        let body = imagen_predict_body("一只猫", ImageSize::Standard);
        assert_eq!(body["instances"][0]["prompt"], "一只猫");
        assert_eq!(body["parameters"]["aspectRatio"], "4:3");
        assert_eq!(body["parameters"]["sampleCount"], 1);
    }

    #[test]
    fn test_extract_openai_chat() {
        let value = json!({"choices": [{"message": {"content": "回答"}}]});
        assert_eq!(extract_openai_chat(&value).unwrap(), "回答");

        let empty = json!({"choices": [{"message": {"content": ""}}]});
        assert_eq!(extract_openai_chat(&empty), None);
        assert_eq!(extract_openai_chat(&json!({})), None);
    }

    #[test]
    fn test_extract_gemini_text_joins_parts() {
        let value = json!({
            "candidates": [{"content": {"parts": [{"text": "前半"}, {"text": "后半"}]}}]
        });
        assert_eq!(extract_gemini_text(&value).unwrap(), "前半后半");
        assert_eq!(extract_gemini_text(&json!({"candidates": []})), None);
    }

    #[test]
    fn test_extract_openai_image_prefers_inline_bytes() {
        let both = json!({"data": [{"b64_json": "QUJD", "url": "https://x/y.png"}]});
        assert_eq!(
            extract_openai_image(&both).unwrap(),
            "data:image/png;base64,QUJD"
        );

        let url_only = json!({"data": [{"url": "https://x/y.png"}]});
        assert_eq!(extract_openai_image(&url_only).unwrap(), "https://x/y.png");
        assert_eq!(extract_openai_image(&json!({"data": []})), None);
    }

    #[test]
    fn test_extract_gemini_image_reads_inline_data() {
        let value = json!({
            "candidates": [{"content": {"parts": [
                {"text": "描述"},
                {"inlineData": {"data": "QUJD", "mimeType": "image/jpeg"}}
            ]}}]
        });
        assert_eq!(
            extract_gemini_image(&value).unwrap(),
            "data:image/jpeg;base64,QUJD"
        );

        let no_mime = json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"data": "QUJD"}}]}}]
        });
        assert_eq!(
            extract_gemini_image(&no_mime).unwrap(),
            "data:image/png;base64,QUJD"
        );
    }

    #[test]
    fn test_extract_imagen_image() {
        let value = json!({"predictions": [{"bytesBase64Encoded": "QUJD"}]});
        assert_eq!(
            extract_imagen_image(&value).unwrap(),
            "data:image/jpeg;base64,QUJD"
        );
        assert_eq!(extract_imagen_image(&json!({"predictions": []})), None);
    }

    #[test]
    fn test_strip_css_fences() {
        let fenced = "```css\n#preview-root { color: red; }\n```";
        assert_eq!(strip_css_fences(fenced), "#preview-root { color: red; }");
        assert_eq!(strip_css_fences("  plain  "), "plain");
    }
}
