use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::GenerateError;

pub const FUNCTION_NAME_MESSAGE: &str =
    "Function name may only contain letters, digits, underscores and spaces.";

static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\s]+$").expect("valid regex"));

/**
 * \brief 校验结果：通过，或携带面向用户的提示。
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Validation {
    Valid,
    Invalid { message: String },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }
}

/**
 * \brief 函数名是否满足 `^[A-Za-z0-9_\s]+$`。
 */
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(name)
}

pub fn validate_function_name(name: &str) -> Validation {
    if is_valid_identifier(name) {
        Validation::Valid
    } else {
        Validation::Invalid {
            message: FUNCTION_NAME_MESSAGE.to_string(),
        }
    }
}

/**
 * \brief 生成前的唯一前置条件；不通过则阻止生成。
 */
pub fn ensure_function_name(name: &str) -> Result<(), GenerateError> {
    match validate_function_name(name) {
        Validation::Valid => Ok(()),
        Validation::Invalid { message } => Err(GenerateError::InvalidFunctionName {
            name: name.to_string(),
            message,
        }),
    }
}
