use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use std::path::Path;
use tracing::warn;

use crate::config::types::ApplicationConfig;

/// 環境變數前綴，例如 `QUEUE_BRIDGE_RABBITMQ__HOST`
pub const ENV_PREFIX: &str = "QUEUE_BRIDGE";

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 解析環境名稱，無法辨識時視為開發環境
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// `.env` 檔中的鍵與配置路徑的對應
fn dotenv_target(key: &str) -> Option<&'static str> {
    match key {
        "HOST" => Some("rabbitmq.host"),
        "USER" => Some("rabbitmq.user"),
        _ => None,
    }
}

/// 配置加載器，負責根據環境加載適當的配置
///
/// 優先順序由低到高: 內建預設值、`config/{env}.toml`、`.env` 檔中的
/// `HOST`/`USER`、`QUEUE_BRIDGE_` 前綴的環境變數。
pub struct ConfigLoader;

impl ConfigLoader {
    /// 從指定目錄與 `.env` 檔載入配置
    pub fn load_from(
        config_dir: &Path,
        env: Environment,
        dotenv: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        let mut config_builder = Config::builder()
            .add_source(Config::try_from(&ApplicationConfig::default())?)
            .add_source(File::from(config_dir.join(env.as_filename())).required(false));

        if let Some(path) = dotenv {
            config_builder = config_builder.add_source(Self::dotenv_layer(path)?);
        }

        // 從環境變數加載配置（優先級最高）
        config_builder = config_builder.add_source(
            ConfigEnvironment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        config_builder.build()
    }

    /// 只讀取 `.env` 檔本身，不從行程環境取值
    fn dotenv_layer(path: &Path) -> Result<Config, ConfigError> {
        let mut layer = Config::builder();

        if !path.is_file() {
            warn!("找不到 {}，RabbitMQ 連線使用預設的 HOST/USER", path.display());
            return layer.build();
        }

        let entries = dotenvy::from_path_iter(path).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| ConfigError::Foreign(Box::new(e)))?;
            if let Some(target) = dotenv_target(&key) {
                layer = layer.set_override(target, value)?;
            }
        }

        layer.build()
    }
}
