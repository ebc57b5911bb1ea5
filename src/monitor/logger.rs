// monitor/logger.rs - 日誌系統初始化

use anyhow::{anyhow, Result};
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LogConfig;

/// 將配置中的日誌級別轉為 tracing 級別，無法辨識時為 INFO
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// `RUST_LOG` 優先，否則使用配置中的級別
fn build_filter(log_config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(&log_config.level).to_string()))
}

/// 初始化日誌系統
///
/// 設定 `log.directory` 時額外寫入每日輪替的日誌檔，回傳的 guard 必須
/// 在程式結束前保持存活，否則緩衝中的日誌會遺失。
pub fn init_logging(log_config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let json = log_config.format.eq_ignore_ascii_case("json");

    let (writer, guard) = match &log_config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &log_config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(build_filter(log_config))
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer().pretty()))
        .with(writer.map(|writer| fmt::layer().json().with_ansi(false).with_writer(writer)))
        .try_init()
        .map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(guard)
}
