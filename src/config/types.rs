use serde::{Deserialize, Serialize};

use crate::config::validation::{ValidationError, ValidationUtils, Validator};
use crate::utils::serde_helpers::empty_string_as_none;

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub rabbitmq: RabbitMQConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.log.validate()?;
        self.rabbitmq.validate()?;
        self.gateway.validate()?;
        self.probe.validate()?;

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
    /// 日誌檔目錄，未設定時只輸出到標準輸出
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
            file_prefix: "queue_bridge".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::choice(&self.level, &["trace", "debug", "info", "warn", "error"], "log.level")?;

        // 驗證日誌格式
        ValidationUtils::choice(&self.format, &["pretty", "json"], "log.format")?;

        ValidationUtils::requires(
            self.directory.is_some(),
            &self.file_prefix,
            "log.directory",
            "log.file_prefix",
        )?;

        Ok(())
    }
}

/// RabbitMQ配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RabbitMQConfig {
    /// 主機位址，可含埠號 (例如: "localhost:5672")
    pub host: String,
    /// 使用者名稱，同時作為密碼
    pub user: String,
}

impl Default for RabbitMQConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            user: "guest".to_string(),
        }
    }
}

impl Validator for RabbitMQConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::required(&self.host, "rabbitmq.host")?;
        ValidationUtils::required(&self.user, "rabbitmq.user")?;

        Ok(())
    }
}

/// HTTP 監聽設定，兩個示範服務共用
fn validate_listener(host: &str, port: u16, timeout_secs: u64, section: &str) -> Result<(), ValidationError> {
    ValidationUtils::ip_address(host, &format!("{}.host", section))?;
    ValidationUtils::port(port, &format!("{}.port", section))?;
    ValidationUtils::between(timeout_secs, 1, 300, &format!("{}.request_timeout_secs", section))
}

/// HTTP 轉發服務配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// 轉發消息的目標交換機
    pub exchange: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
            exchange: "main".to_string(),
        }
    }
}

impl Validator for GatewayConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_listener(&self.host, self.port, self.request_timeout_secs, "gateway")?;
        ValidationUtils::required(&self.exchange, "gateway.exchange")?;

        Ok(())
    }
}

/// 測試探針服務配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// `/ping` 發布的交換機
    pub exchange: String,
    /// 消費者來源名稱
    pub origin: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            request_timeout_secs: 30,
            exchange: "test".to_string(),
            origin: "queue-test".to_string(),
        }
    }
}

impl Validator for ProbeConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_listener(&self.host, self.port, self.request_timeout_secs, "probe")?;
        ValidationUtils::required(&self.exchange, "probe.exchange")?;
        ValidationUtils::required(&self.origin, "probe.origin")?;

        Ok(())
    }
}
