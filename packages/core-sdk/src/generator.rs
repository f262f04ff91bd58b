use serde::Serialize;

use crate::error::GenerateError;
use crate::models::GenerationOptions;
use crate::request::build_chat_request;
use crate::template::render_module;
use crate::telemetry;
use crate::validate::ensure_function_name;

const FALLBACK_MODULE_NAME: &str = "OpenAIModule";

/**
 * \brief 生成结果：建议的 .bas 文件名与完整源码。
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedModule {
    pub file_name: String,
    pub source: String,
}

/**
 * \brief 校验 → 构造请求 → 渲染，一次完成。不写日志，不产生副作用。
 */
pub fn generate(options: &GenerationOptions) -> Result<GeneratedModule, GenerateError> {
    ensure_function_name(&options.function_name)?;
    let request = build_chat_request(options);
    let source = render_module(options, &request)?;
    Ok(GeneratedModule {
        file_name: module_file_name(&options.function_name),
        source,
    })
}

/**
 * \brief 同 generate，并记录遥测事件（不含 API Key 与提示词内容）。
 */
pub fn generate_logged(
    options: &GenerationOptions,
    category: &str,
) -> Result<GeneratedModule, GenerateError> {
    match generate(options) {
        Ok(module) => {
            telemetry::log_event(
                category,
                &format!(
                    "generated provider={} function={} few_shots={} len={}",
                    options.provider,
                    options.function_name,
                    options.few_shots.len(),
                    module.source.len()
                ),
            );
            Ok(module)
        }
        Err(e) => {
            telemetry::log_error(category, &format!("generation rejected: {}", e));
            Err(e)
        }
    }
}

/**
 * \brief 下载用的 .bas 文件名。
 *
 * 函数名先去掉首尾空白；为空时使用 OpenAIModule。未去空白时 "Ask AI " 会得到
 * "Ask AI .bas"，这里得到 "Ask AI.bas"。
 */
pub fn module_file_name(function_name: &str) -> String {
    let trimmed = function_name.trim();
    let stem = if trimmed.is_empty() {
        FALLBACK_MODULE_NAME
    } else {
        trimmed
    };
    format!("{}.bas", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FewShot;

    #[test]
    fn test_generate_valid_options() {
        let opts = GenerationOptions {
            api_key: "sk".into(),
            function_name: "CallGPT".into(),
            system_prompt: "sys".into(),
            few_shots: vec![FewShot::new("h", "a")],
            ..Default::default()
        };
        let module = generate(&opts).expect("generate");
        assert_eq!(module.file_name, "CallGPT.bas");
        assert!(module
            .source
            .contains("Function CallGPT(prompt As String) As String"));
        assert_eq!(generate(&opts).expect("generate again"), module);
    }

    #[test]
    fn test_rejected_name_produces_no_output() {
        let opts = GenerationOptions {
            function_name: "bad-name!".into(),
            ..Default::default()
        };
        let err = generate(&opts).unwrap_err();
        match err {
            GenerateError::InvalidFunctionName { name, message } => {
                assert_eq!(name, "bad-name!");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_module_file_name_fallback() {
        assert_eq!(module_file_name("Ask"), "Ask.bas");
        assert_eq!(module_file_name("  "), "OpenAIModule.bas");
        assert_eq!(module_file_name("Ask AI "), "Ask AI.bas");
    }
}
