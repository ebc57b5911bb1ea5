// 消息系統模組
// 以 RabbitMQ 主題交換機為基礎的消息封裝、發布與消費

// 導出子模組
pub mod protocol;
pub mod rabbitmq;

// 重新導出常用類型
pub use protocol::{Intent, Message, MessageType, Operation};
pub use rabbitmq::client::{QueueClient, RabbitMQClient};
pub use rabbitmq::consumer::{MessageHandler, RabbitMQConsumer};
pub use rabbitmq::error::RabbitMQError;
pub use rabbitmq::publisher::RabbitMQPublisher;
