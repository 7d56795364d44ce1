//! System prompts
//!
//! Fixed product strings steering each AI operation. Wording changes alter
//! output quality for every user, so edits belong in a product decision,
//! not a refactor.

/// Assistant persona for the chat panel.
pub const CHAT_SYSTEM_PROMPT: &str =
    "你是一个专业的微信公众号文章编辑助手。请用中文回答。保持回答简洁、专业。";

/// Rules for the one-click layout pass over the whole article.
pub const AUTO_LAYOUT_SYSTEM_PROMPT: &str = r#"你是一个微信公众号排版专家。请对用户提供的文章内容进行自动排版优化，使其符合公众号阅读习惯。
  具体要求：
  1. 结构优化：自动识别文章逻辑，使用 Markdown 标题语法 (#, ##, ###) 划分层级 (H1-H3)。
  2. 段落优化：将过长的段落拆分为简短的段落，适当增加空行，提升移动端阅读体验。
  3. 重点突出：识别关键信息、金句或总结，使用引用块 (>) 包裹；对核心关键词使用加粗 (**)。
  4. 列表优化：将步骤、要点等内容转换为无序列表 (-) 或有序列表 (1.)。
  5. 严禁篡改：保持原文核心意思和文字内容不变，仅做结构和样式的Markdown语法调整。
  6. 输出要求：直接返回优化后的 Markdown 源码，不要包含 "好的"、"优化如下" 等任何解释性废话。"#;

/// Rules for skin CSS generation, closed with the user's style description.
pub fn skin_css_system_prompt(description: &str) -> String {
    format!(
        r#"你是一个CSS专家。请根据用户的描述，生成一段用于微信公众号文章预览的CSS代码。
   HTML结构在一个 id="preview-root" 的div中。
   请只返回纯CSS代码，不要包含markdown代码块标记（如 ```css ）。
   必须包含针对 #preview-root h1, h2, p, blockquote, img, li 的样式。
   风格必须符合：{description}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skin_prompt_embeds_description() {
        let prompt = skin_css_system_prompt("复古红色杂志风");
        assert!(prompt.starts_with("你是一个CSS专家。"));
        assert!(prompt.contains("id=\"preview-root\""));
        assert!(prompt.ends_with("风格必须符合：复古红色杂志风"));
    }

    #[test]
    fn test_layout_prompt_forbids_content_changes() {
        assert!(AUTO_LAYOUT_SYSTEM_PROMPT.contains("严禁篡改"));
    }
}
