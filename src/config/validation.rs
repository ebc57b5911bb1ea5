use std::net::IpAddr;

use thiserror::Error;

/// 配置驗證錯誤，`field` 一律使用配置路徑 (例如 `gateway.port`)
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} 不可為空")]
    Missing { field: String },

    #[error("{field} 的值 {value} 不在允許的選項內: {allowed}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("{field} 的值 {value} 不在範圍 {min}..={max} 內")]
    OutOfRange {
        field: String,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{field} 必須是 IP 位址，目前為 {value}")]
    NotAnAddress { field: String, value: String },

    #[error("設定 {field} 時 {required} 不可為空")]
    Requires { field: String, required: String },
}

/// 配置驗證器trait
pub trait Validator {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// 驗證工具函數
pub struct ValidationUtils;

impl ValidationUtils {
    /// 去除空白後不可為空
    pub fn required(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Missing {
                field: field.to_string(),
            });
        }
        Ok(())
    }

    /// 不分大小寫比對允許的選項
    pub fn choice(value: &str, allowed: &[&str], field: &str) -> Result<(), ValidationError> {
        if allowed.iter().any(|option| option.eq_ignore_ascii_case(value.trim())) {
            return Ok(());
        }
        Err(ValidationError::NotAllowed {
            field: field.to_string(),
            value: value.to_string(),
            allowed: allowed.join(", "),
        })
    }

    pub fn between(value: u64, min: u64, max: u64, field: &str) -> Result<(), ValidationError> {
        if !(min..=max).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }

    /// 監聽埠不可為 0
    pub fn port(value: u16, field: &str) -> Result<(), ValidationError> {
        Self::between(u64::from(value), 1, u64::from(u16::MAX), field)
    }

    /// HTTP 服務只接受 IP 位址，不做名稱解析
    pub fn ip_address(value: &str, field: &str) -> Result<(), ValidationError> {
        value
            .parse::<IpAddr>()
            .map(|_| ())
            .map_err(|_| ValidationError::NotAnAddress {
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    /// `field` 有設定時 `required` 也必須有值
    pub fn requires(is_set: bool, required_value: &str, field: &str, required: &str) -> Result<(), ValidationError> {
        if is_set && required_value.trim().is_empty() {
            return Err(ValidationError::Requires {
                field: field.to_string(),
                required: required.to_string(),
            });
        }
        Ok(())
    }
}
