use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::BundleError;
use crate::generator::{generate_logged, GeneratedModule};
use crate::models::GenerationOptions;
use crate::telemetry;

pub const JSON_CONVERTER_FILE: &str = "JsonConverter.bas";

/**
 * \brief 打包下载的内容：生成的模块 + 外部 JSON 解析库。
 */
#[derive(Debug, Clone, Serialize)]
pub struct Bundle {
    pub module: GeneratedModule,
    pub json_converter: GeneratedModule,
}

/**
 * \brief 下载 JsonConverter.bas 原文。单次 GET，不重试，内容不校验。
 */
pub async fn fetch_json_converter(url: &str) -> Result<String, BundleError> {
    let fetch_err = |source| BundleError::Fetch {
        url: url.to_string(),
        source,
    };
    let resp = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(fetch_err)?;
    if !resp.status().is_success() {
        return Err(BundleError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }
    resp.text().await.map_err(fetch_err)
}

/**
 * \brief 生成模块并拉取依赖，组成完整的下载包。
 */
pub async fn build_bundle(
    options: &GenerationOptions,
    json_converter_url: &str,
) -> Result<Bundle, BundleError> {
    let module = generate_logged(options, "bundle")?;
    let source = match fetch_json_converter(json_converter_url).await {
        Ok(text) => text,
        Err(e) => {
            telemetry::log_error("bundle", &format!("fetch dependency failed: {}", e));
            return Err(e);
        }
    };
    telemetry::log_event(
        "bundle",
        &format!("fetched {} bytes from {}", source.len(), json_converter_url),
    );
    Ok(Bundle {
        module,
        json_converter: GeneratedModule {
            file_name: JSON_CONVERTER_FILE.to_string(),
            source,
        },
    })
}

/**
 * \brief 将下载包写入目录，返回写出的文件路径。
 */
pub async fn write_bundle(dir: &Path, bundle: &Bundle) -> Result<Vec<PathBuf>, BundleError> {
    tokio::fs::create_dir_all(dir).await?;
    let mut written = Vec::with_capacity(2);
    for file in [&bundle.module, &bundle.json_converter] {
        let path = dir.join(&file.file_name);
        tokio::fs::write(&path, file.source.as_bytes()).await?;
        written.push(path);
    }
    Ok(written)
}
