use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::models::{GenerationOptions, Message, Role};
use crate::provider::{ProviderKind, OPENAI_MODEL};

/**
 * \brief 运行时 prompt 的占位符，不含双引号，序列化后保持原样。
 */
pub const PROMPT_PLACEHOLDER: &str = "<!-PROMPT_PLACEHOLDER-!>";

const AZURE_MAX_TOKENS: u32 = 800;
const AZURE_TOP_P: f64 = 0.95;

/**
 * \brief Chat Completion 请求体。字段声明顺序即序列化顺序，缺省字段不输出。
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub messages: Vec<Message>,
}

/**
 * \brief 按 Provider 构造请求体。
 *
 * 消息顺序固定：system、每个少样本的 user/assistant、最后一条内容为占位符的 user。
 * 空字符串原样保留，不做校验。
 */
pub fn build_chat_request(options: &GenerationOptions) -> ChatRequest {
    let mut messages = Vec::with_capacity(options.few_shots.len() * 2 + 2);
    messages.push(Message::new(Role::System, options.system_prompt.as_str()));
    for shot in &options.few_shots {
        messages.push(Message::new(Role::User, shot.human.as_str()));
        messages.push(Message::new(Role::Assistant, shot.ai.as_str()));
    }
    messages.push(Message::new(Role::User, PROMPT_PLACEHOLDER));

    match options.provider {
        ProviderKind::OpenAI => ChatRequest {
            model: Some(OPENAI_MODEL.to_string()),
            temperature: None,
            top_p: None,
            max_tokens: None,
            messages,
        },
        // deployment is carried by the URL
        ProviderKind::AzureOpenAI => ChatRequest {
            model: None,
            temperature: Some(Number::from(0u8)),
            top_p: Number::from_f64(AZURE_TOP_P),
            max_tokens: Some(AZURE_MAX_TOKENS),
            messages,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FewShot;

    fn options(provider: ProviderKind, shots: Vec<FewShot>) -> GenerationOptions {
        GenerationOptions {
            provider,
            function_name: "CallGPT".into(),
            system_prompt: "be brief".into(),
            few_shots: shots,
            ..Default::default()
        }
    }

    #[test]
    fn test_message_sequence_invariant() {
        let shots = vec![FewShot::new("q1", "a1"), FewShot::new("q2", "a2")];
        let req = build_chat_request(&options(ProviderKind::OpenAI, shots));
        let roles: Vec<Role> = req.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User
            ]
        );
        let contents: Vec<&str> = req.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["be brief", "q1", "a1", "q2", "a2", PROMPT_PLACEHOLDER]
        );
    }

    #[test]
    fn test_openai_request_fields() {
        let req = build_chat_request(&options(ProviderKind::OpenAI, vec![]));
        let text = serde_json::to_string(&req).expect("serialize request");
        assert_eq!(
            text,
            r#"{"model":"gpt-4o","messages":[{"role":"system","content":"be brief"},{"role":"user","content":"<!-PROMPT_PLACEHOLDER-!>"}]}"#
        );
    }

    #[test]
    fn test_azure_request_fields() {
        let req = build_chat_request(&options(ProviderKind::AzureOpenAI, vec![]));
        assert!(req.model.is_none());
        let text = serde_json::to_string(&req).expect("serialize request");
        assert!(
            text.starts_with(r#"{"temperature":0,"top_p":0.95,"max_tokens":800,"messages":["#),
            "unexpected azure payload: {}",
            text
        );
    }

    #[test]
    fn test_empty_inputs_are_kept() {
        let mut opts = options(ProviderKind::OpenAI, vec![FewShot::default()]);
        opts.system_prompt.clear();
        let req = build_chat_request(&opts);
        assert_eq!(req.messages.len(), 4);
        assert_eq!(req.messages[0].content, "");
        assert_eq!(req.messages[1].content, "");
        assert_eq!(req.messages[2].content, "");
    }
}
