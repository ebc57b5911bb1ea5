// RabbitMQ 模組
// 提供與 RabbitMQ 通訊的基礎設施

// 導出子模組
pub mod client;
pub mod connection;
pub mod consumer;
pub mod error;
pub mod publisher;

// 重新導出常用結構
pub use client::{DeliveryStream, QueueClient, QueueDelivery, RabbitMQClient};
pub use connection::amqp_url;
pub use consumer::{MessageHandler, RabbitMQConsumer};
pub use error::RabbitMQError;
pub use publisher::RabbitMQPublisher;
