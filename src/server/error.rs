use thiserror::Error;

use crate::messaging::RabbitMQError;

/// 伺服器錯誤類型
#[derive(Error, Debug)]
pub enum ServerError {
    /// 配置錯誤
    #[error("配置錯誤: {0}")]
    Config(String),

    /// RabbitMQ 錯誤
    #[error("RabbitMQ 錯誤: {0}")]
    Broker(#[from] RabbitMQError),

    /// IO 錯誤
    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),
}

/// 伺服器結果類型別名
pub type ServerResult<T> = Result<T, ServerError>;
