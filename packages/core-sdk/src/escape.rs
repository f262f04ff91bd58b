use crate::error::GenerateError;
use crate::request::{ChatRequest, PROMPT_PLACEHOLDER};

/**
 * \brief 拼接点处写入的 VBA 表达式：关闭字面量、连接运行时变量 prompt、重新打开字面量。
 */
pub const PROMPT_SPLICE: &str = r#"" & prompt & ""#;

/**
 * \brief 转义为 VBA 字符串字面量内容：双引号加倍，其余字符不变。
 */
pub fn sanitize_as_vba_string(payload: &str) -> String {
    payload.replace('"', "\"\"")
}

/**
 * \brief 以占位符为界切分的请求 JSON 文本。
 *
 * prefix + 运行时 prompt + suffix 即为发送的 JSON。两段各自独立转义，
 * 拼接点的边界由 to_vba_expression 显式给出，而不是文本替换。
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadLiteral {
    /** \brief 占位符之前的 JSON 文本（未转义） */
    pub prefix: String,
    /** \brief 占位符之后的 JSON 文本（未转义） */
    pub suffix: String,
}

impl PayloadLiteral {
    /**
     * \brief 序列化请求并在占位消息处切分。
     *
     * 占位消息总是 messages 的最后一项，且 messages 是最后一个字段，
     * 因此取最后一次出现的位置；用户内容里出现同样的文本不会被误切。
     */
    pub fn from_request(request: &ChatRequest) -> Result<Self, GenerateError> {
        let json = serde_json::to_string(request)?;
        let (prefix, suffix) = json
            .rsplit_once(PROMPT_PLACEHOLDER)
            .ok_or(GenerateError::MissingPlaceholder)?;
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /**
     * \brief 生成放入 `data = "..."` 双引号之间的文本。
     */
    pub fn to_vba_expression(&self) -> String {
        format!(
            "{}{}{}",
            sanitize_as_vba_string(&self.prefix),
            PROMPT_SPLICE,
            sanitize_as_vba_string(&self.suffix)
        )
    }
}
