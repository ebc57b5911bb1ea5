use lapin::Error as LapinError;
use serde_json::Error as SerdeError;
use thiserror::Error;

/// RabbitMQ 包裝層的錯誤類型，每個變體都帶有操作的上下文
#[derive(Error, Debug)]
pub enum RabbitMQError {
    #[error("Error dialing the RabbitMQ instance at {host}")]
    Dial {
        host: String,
        #[source]
        source: LapinError,
    },

    #[error("Error opening RabbitMQ channel")]
    OpenChannel(#[source] LapinError),

    #[error("Error putting the channel into transaction mode")]
    TransactionMode(#[source] LapinError),

    #[error("Error declaring exchange '{exchange}'")]
    DeclareExchange {
        exchange: String,
        #[source]
        source: LapinError,
    },

    #[error("Error declaring queue '{queue}'")]
    DeclareQueue {
        queue: String,
        #[source]
        source: LapinError,
    },

    #[error("Error binding queue '{queue}' to the exchange '{exchange}'")]
    BindQueue {
        queue: String,
        exchange: String,
        #[source]
        source: LapinError,
    },

    #[error("Error publishing the message to exchange '{exchange}'")]
    Publish {
        exchange: String,
        #[source]
        source: LapinError,
    },

    #[error("Error starting to consume for consumer '{consumer}' on queue '{queue}'")]
    Consume {
        queue: String,
        consumer: String,
        #[source]
        source: LapinError,
    },

    #[error("Error committing the channel transaction")]
    Commit(#[source] LapinError),

    #[error("Error acknowledging delivery {delivery_tag}")]
    Ack {
        delivery_tag: u64,
        #[source]
        source: LapinError,
    },

    #[error("Error receiving delivery")]
    Delivery(#[source] LapinError),

    #[error("Error closing channel")]
    CloseChannel(#[source] LapinError),

    #[error("Error closing connection")]
    CloseConnection(#[source] LapinError),

    #[error("Error marshalling message")]
    Serialization(#[from] SerdeError),

    #[error("Error registering queue '{queue}'")]
    Register {
        queue: String,
        #[source]
        source: Box<RabbitMQError>,
    },

    #[error("Other error: {0}")]
    Other(String),
}

impl RabbitMQError {
    /// 以註冊上下文包裝錯誤
    pub fn register(queue: impl Into<String>, source: RabbitMQError) -> Self {
        RabbitMQError::Register {
            queue: queue.into(),
            source: Box::new(source),
        }
    }
}

/// 將字符串錯誤轉換為 RabbitMQ 錯誤
impl From<String> for RabbitMQError {
    fn from(error: String) -> Self {
        RabbitMQError::Other(error)
    }
}

/// 將 &str 錯誤轉換為 RabbitMQ 錯誤
impl From<&str> for RabbitMQError {
    fn from(error: &str) -> Self {
        RabbitMQError::Other(error.to_string())
    }
}
