use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::GenerationOptions;

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4o";
pub const AZURE_API_VERSION: &str = "2024-02-15-preview";

/**
 * \brief 生成目标的服务类型，每次生成选定一次。
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "azure-openai", alias = "azure", alias = "azure_openai")]
    AzureOpenAI,
}

/**
 * \brief 某个 Provider 额外需要的表单字段描述。
 */
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ProviderInput {
    /** \brief 对应 GenerationOptions 的字段名 */
    pub id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

/**
 * \brief Provider 描述，供 UI/CLI 列出可选项。
 */
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDescriptor {
    pub id: ProviderKind,
    pub name: &'static str,
    pub inputs: &'static [ProviderInput],
}

const AZURE_INPUTS: &[ProviderInput] = &[
    ProviderInput {
        id: "azure_deployment",
        label: "Deployment name",
        placeholder: "gpt-8-human",
    },
    ProviderInput {
        id: "azure_endpoint",
        label: "API endpoint",
        placeholder: "https://deployment.azure.somewhere",
    },
];

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAI, ProviderKind::AzureOpenAI];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::AzureOpenAI => "azure-openai",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::AzureOpenAI => "Azure OpenAI",
        }
    }

    /**
     * \brief 除通用字段（API Key、函数名、系统提示词）外需要的输入。
     */
    pub fn extra_inputs(&self) -> &'static [ProviderInput] {
        match self {
            ProviderKind::OpenAI => &[],
            ProviderKind::AzureOpenAI => AZURE_INPUTS,
        }
    }

    pub fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: *self,
            name: self.display_name(),
            inputs: self.extra_inputs(),
        }
    }

    /**
     * \brief 生成宏中请求的目标地址。
     *
     * Azure 地址按原样拼接，不做尾部斜杠归一化，也不校验。
     */
    pub fn endpoint_url(&self, options: &GenerationOptions) -> String {
        match self {
            ProviderKind::OpenAI => OPENAI_CHAT_URL.to_string(),
            ProviderKind::AzureOpenAI => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                options.azure_endpoint, options.azure_deployment, AZURE_API_VERSION
            ),
        }
    }

    /**
     * \brief 生成宏中设置鉴权头的 VBA 语句（引用宏内变量 apiKey）。
     */
    pub fn auth_header_statement(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => r#"xmlHttp.setRequestHeader "Authorization", "Bearer " & apiKey"#,
            ProviderKind::AzureOpenAI => r#"xmlHttp.setRequestHeader "api-key", apiKey"#,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "azure" | "azure-openai" | "azure_openai" => Ok(ProviderKind::AzureOpenAI),
            other => Err(anyhow::anyhow!(
                "unknown provider '{}', expected openai or azure-openai",
                other
            )),
        }
    }
}

/**
 * \brief 全部 Provider 的描述列表。
 */
pub fn descriptors() -> Vec<ProviderDescriptor> {
    ProviderKind::ALL.iter().map(|p| p.descriptor()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_azure_endpoint_is_exact_concatenation() {
        let opts = GenerationOptions {
            azure_endpoint: "https://x".into(),
            azure_deployment: "d1".into(),
            ..Default::default()
        };
        assert_eq!(
            ProviderKind::AzureOpenAI.endpoint_url(&opts),
            "https://x/openai/deployments/d1/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_openai_endpoint_ignores_azure_fields() {
        let opts = GenerationOptions {
            azure_endpoint: "https://x".into(),
            azure_deployment: "d1".into(),
            ..Default::default()
        };
        assert_eq!(ProviderKind::OpenAI.endpoint_url(&opts), OPENAI_CHAT_URL);
    }

    #[test]
    fn test_parse_provider_aliases() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert_eq!("azure".parse::<ProviderKind>().unwrap(), ProviderKind::AzureOpenAI);
        assert_eq!(
            " Azure_OpenAI ".parse::<ProviderKind>().unwrap(),
            ProviderKind::AzureOpenAI
        );
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_serde_names_round_trip_through_from_str() {
        for kind in ProviderKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize kind");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_descriptors_list_azure_inputs() {
        let list = descriptors();
        assert_eq!(list.len(), 2);
        assert!(list[0].inputs.is_empty());
        let ids: Vec<_> = list[1].inputs.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["azure_deployment", "azure_endpoint"]);
    }
}
