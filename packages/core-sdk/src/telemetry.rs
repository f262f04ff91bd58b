use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use once_cell::sync::Lazy;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

const LOG_FILE: &str = "vbaforge.log";

struct Sink {
    enabled: bool,
    dir: PathBuf,
}

static SINK: Lazy<std::sync::RwLock<Sink>> = Lazy::new(|| {
    std::sync::RwLock::new(Sink {
        enabled: false,
        dir: PathBuf::from("logs"),
    })
});

/**
 * \brief 更新遥测开关状态。
 */
pub fn set_enabled(enabled: bool) {
    if let Ok(mut guard) = SINK.write() {
        guard.enabled = enabled;
    }
}

/**
 * \brief 查询当前遥测开关状态。
 */
pub fn is_enabled() -> bool {
    SINK.read().map(|g| g.enabled).unwrap_or(false)
}

/**
 * \brief 修改日志目录（默认 ./logs）。
 */
pub fn set_log_dir(dir: impl AsRef<Path>) {
    if let Ok(mut guard) = SINK.write() {
        guard.dir = dir.as_ref().to_path_buf();
    }
}

/**
 * \brief 记录常规事件。
 */
pub fn log_event(category: &str, message: &str) {
    record("INFO", category, message);
}

/**
 * \brief 记录错误事件。
 */
pub fn log_error(category: &str, message: &str) {
    record("ERROR", category, message);
}

fn record(level: &str, category: &str, message: &str) {
    let dir = match SINK.read() {
        Ok(guard) if guard.enabled => guard.dir.clone(),
        _ => return,
    };
    if let Err(err) = write_line(&dir, level, category, message) {
        eprintln!("telemetry write failed: {}", err);
    }
}

fn write_line(dir: &Path, level: &str, category: &str, message: &str) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;
    writeln!(file, "{} [{}] {} - {}", timestamp, level, category, message)?;
    Ok(())
}
