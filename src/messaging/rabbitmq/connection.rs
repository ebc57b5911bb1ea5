use lapin::{Connection, ConnectionProperties};
use tracing::info;

use crate::messaging::rabbitmq::error::RabbitMQError;

/// 組成 AMQP 連線字串，帳號與密碼相同
pub fn amqp_url(host: &str, user: &str) -> String {
    format!("amqp://{}:{}@{}", user, user, host)
}

/// 連線到 RabbitMQ
pub async fn connect(host: &str, user: &str) -> Result<Connection, RabbitMQError> {
    info!("Connecting to RabbitMQ at {} as {}", host, user);

    let properties = ConnectionProperties::default()
        .with_executor(tokio_executor_trait::Tokio::current());

    let conn = Connection::connect(&amqp_url(host, user), properties)
        .await
        .map_err(|source| RabbitMQError::Dial {
            host: host.to_string(),
            source,
        })?;

    info!("Successfully connected to RabbitMQ");

    Ok(conn)
}
