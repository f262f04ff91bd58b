use std::path::PathBuf;

pub const JSON_CONVERTER_URL: &str =
    "https://raw.githubusercontent.com/VBA-tools/VBA-JSON/refs/heads/master/JsonConverter.bas";

/**
 * \brief 进程级运行配置，全部来自环境变量，不做持久化。
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /** \brief 前端静态资源目录 */
    pub ui_dir: PathBuf,
    /** \brief ui_dir 不存在时的备用目录 */
    pub ui_fallback_dir: PathBuf,
    /** \brief JsonConverter.bas 的下载地址 */
    pub json_converter_url: String,
    pub telemetry_enabled: bool,
    /** \brief 遥测日志目录 */
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ui_dir: PathBuf::from("ui/dist"),
            ui_fallback_dir: PathBuf::from("web"),
            json_converter_url: JSON_CONVERTER_URL.to_string(),
            telemetry_enabled: false,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            ui_dir: lookup("VBAFORGE_UI_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.ui_dir),
            ui_fallback_dir: lookup("VBAFORGE_UI_FALLBACK")
                .map(PathBuf::from)
                .unwrap_or(defaults.ui_fallback_dir),
            json_converter_url: lookup("VBAFORGE_JSON_CONVERTER_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.json_converter_url),
            telemetry_enabled: lookup("VBAFORGE_TELEMETRY")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.telemetry_enabled),
            log_dir: lookup("VBAFORGE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }

    /**
     * \brief 实际提供服务的静态目录：ui_dir 存在则用它，否则用备用目录。
     */
    pub fn static_root(&self) -> PathBuf {
        if self.ui_dir.exists() {
            self.ui_dir.clone()
        } else {
            self.ui_fallback_dir.clone()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
