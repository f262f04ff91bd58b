use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, get_service, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::{
    bundle::{self, Bundle},
    config::AppConfig,
    error::{BundleError, GenerateError},
    generator::{generate_logged, GeneratedModule},
    models::GenerationOptions,
    provider::{self, ProviderDescriptor},
    telemetry,
};

type ApiError = (StatusCode, String);

/**
 * \brief 启动本地 HTTP 服务，提供静态前端与生成 API。
 * \param addr 监听地址，如 "127.0.0.1:5173"
 */
pub async fn run(addr: &str, config: AppConfig) -> Result<()> {
    let app = router(config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/**
 * \brief 构造路由；静态目录取自配置。
 */
pub fn router(config: AppConfig) -> Router {
    let static_service =
        get_service(ServeDir::new(config.static_root()).append_index_html_on_directories(true));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/providers", get(list_providers))
        .route("/api/generate", post(generate_script))
        .route("/api/bundle", post(download_bundle))
        .fallback_service(static_service)
        .with_state(Arc::new(config))
}

#[derive(Serialize, Debug)]
struct ProvidersResponse {
    providers: Vec<ProviderDescriptor>,
}

#[derive(Serialize, Debug)]
struct GenerateResponse {
    file_name: String,
    script: String,
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/**
 * \brief 列出可选 Provider 及其额外输入项。
 */
async fn list_providers() -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: provider::descriptors(),
    })
}

/**
 * \brief 生成 VBA 源码：POST /api/generate
 */
async fn generate_script(
    Json(options): Json<GenerationOptions>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let GeneratedModule { file_name, source } =
        generate_logged(&options, "server.generate").map_err(generate_err)?;
    Ok(Json(GenerateResponse {
        file_name,
        script: source,
    }))
}

/**
 * \brief 生成 VBA 源码并附带 JsonConverter.bas：POST /api/bundle
 */
async fn download_bundle(
    State(config): State<Arc<AppConfig>>,
    Json(options): Json<GenerationOptions>,
) -> Result<Json<Bundle>, ApiError> {
    let bundle = bundle::build_bundle(&options, &config.json_converter_url)
        .await
        .map_err(bundle_err)?;
    Ok(Json(bundle))
}

fn generate_err(e: GenerateError) -> ApiError {
    match e {
        GenerateError::InvalidFunctionName { message, .. } => (StatusCode::BAD_REQUEST, message),
        other => internal_err(other),
    }
}

fn bundle_err(e: BundleError) -> ApiError {
    match e {
        BundleError::Generate(inner) => generate_err(inner),
        BundleError::Fetch { .. } | BundleError::Status { .. } => {
            telemetry::log_error("server.bundle", &e.to_string());
            (StatusCode::BAD_GATEWAY, e.to_string())
        }
        BundleError::Io(_) => internal_err(e),
    }
}

fn internal_err<E: std::fmt::Display>(e: E) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
