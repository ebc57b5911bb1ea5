use std::sync::Arc;

use tracing::debug;

use crate::messaging::protocol::Message;
use crate::messaging::rabbitmq::client::{QueueClient, RabbitMQClient};
use crate::messaging::rabbitmq::error::RabbitMQError;

/// 消息發布者
#[derive(Clone)]
pub struct RabbitMQPublisher {
    client: Arc<dyn QueueClient>,
}

impl RabbitMQPublisher {
    /// 以既有客戶端創建發布者
    pub fn new(client: Arc<dyn QueueClient>) -> Self {
        Self { client }
    }

    /// 連線並創建發布者
    pub async fn connect(host: &str, user: &str) -> Result<Self, RabbitMQError> {
        let client = RabbitMQClient::connect(host, user).await?;
        Ok(Self::new(Arc::new(client)))
    }

    /// 以消息的路由鍵將消息發布到指定交換機
    pub async fn publish(&self, exchange: &str, message: &Message) -> Result<(), RabbitMQError> {
        let raw = message.to_json()?;
        let routing_key = message.routing_key();

        debug!(
            "Publishing message to exchange: {}, routing_key: {}",
            exchange, routing_key
        );

        self.client.publish(exchange, &routing_key, &raw).await
    }

    /// 關閉底層連線
    pub async fn close(&self) -> Result<(), RabbitMQError> {
        self.client.close().await
    }
}
