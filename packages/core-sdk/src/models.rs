use serde::{Deserialize, Serialize};

use crate::provider::ProviderKind;

/**
 * \brief 一次生成所需的全部输入，由调用方构造，生成结束即丢弃。
 */
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationOptions {
    /** \brief 目标服务：OpenAI 或 Azure OpenAI */
    #[serde(default)]
    pub provider: ProviderKind,
    /** \brief API Key，原样嵌入生成的 VBA 字符串字面量 */
    #[serde(default)]
    pub api_key: String,
    /** \brief VBA 函数名，需通过 validate::is_valid_identifier */
    pub function_name: String,
    /** \brief 系统提示词，成为 system 消息的内容 */
    #[serde(default)]
    pub system_prompt: String,
    /** \brief 少样本示例，按顺序插入 system 消息与占位消息之间 */
    #[serde(default)]
    pub few_shots: Vec<FewShot>,
    /** \brief Azure 资源地址，仅 Azure 使用 */
    #[serde(default)]
    pub azure_endpoint: String,
    /** \brief Azure 部署名，仅 Azure 使用 */
    #[serde(default)]
    pub azure_deployment: String,
}

/**
 * \brief 少样本示例：一问一答。
 */
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FewShot {
    /** \brief 用户侧示例输入 */
    pub human: String,
    /** \brief 助手侧示例回复 */
    pub ai: String,
}

impl FewShot {
    pub fn new(human: impl Into<String>, ai: impl Into<String>) -> Self {
        Self {
            human: human.into(),
            ai: ai.into(),
        }
    }
}

/**
 * \brief 消息角色，序列化为 OpenAI Chat 的小写角色名。
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/**
 * \brief 消息结构，与 OpenAI Chat 消息格式对齐。
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /** \brief 角色：system/user/assistant */
    pub role: Role,
    /** \brief 内容 */
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: GenerationOptions =
            serde_json::from_str(r#"{"function_name":"CallGPT"}"#).expect("parse options");
        assert_eq!(opts.provider, ProviderKind::OpenAI);
        assert_eq!(opts.function_name, "CallGPT");
        assert!(opts.api_key.is_empty());
        assert!(opts.few_shots.is_empty());
    }

    #[test]
    fn test_message_role_serializes_lowercase() {
        let msg = Message::new(Role::Assistant, "hi");
        let text = serde_json::to_string(&msg).expect("serialize message");
        assert_eq!(text, r#"{"role":"assistant","content":"hi"}"#);
    }
}
