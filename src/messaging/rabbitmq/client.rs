use std::future::Future;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use lapin::{
    acker::Acker,
    message::Delivery,
    options::{
        BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, ExchangeDeclareOptions,
        QueueBindOptions, QueueDeclareOptions,
    },
    types::FieldTable,
    BasicProperties, Channel, Connection, ExchangeKind,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::messaging::rabbitmq::connection;
use crate::messaging::rabbitmq::error::RabbitMQError;

/// 所有交換機固定為主題類型
pub const EXCHANGE_KIND: ExchangeKind = ExchangeKind::Topic;

/// 發布消息的內容類型
pub const CONTENT_TYPE: &str = "text/json";

/// 從佇列收到的原始投遞
pub struct QueueDelivery {
    pub delivery_tag: u64,
    pub routing_key: String,
    pub body: Vec<u8>,
    acker: Option<Acker>,
}

impl QueueDelivery {
    /// 建立不需確認的投遞，用於自動確認模式或測試
    pub fn new(delivery_tag: u64, routing_key: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            delivery_tag,
            routing_key: routing_key.into(),
            body,
            acker: None,
        }
    }

    /// 手動確認此投遞
    pub(crate) async fn ack(&self) -> Result<(), RabbitMQError> {
        match &self.acker {
            Some(acker) => acker
                .ack(BasicAckOptions::default())
                .await
                .map(|_| ())
                .map_err(|source| RabbitMQError::Ack {
                    delivery_tag: self.delivery_tag,
                    source,
                }),
            None => Ok(()),
        }
    }
}

impl From<Delivery> for QueueDelivery {
    fn from(delivery: Delivery) -> Self {
        Self {
            delivery_tag: delivery.delivery_tag,
            routing_key: delivery.routing_key.as_str().to_string(),
            body: delivery.data,
            acker: Some(delivery.acker),
        }
    }
}

/// 投遞串流
pub type DeliveryStream = BoxStream<'static, Result<QueueDelivery, RabbitMQError>>;

/// 佇列客戶端特徵，生產者與消費者都建立在其上
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// 宣告交換機與佇列並以主題模式綁定
    async fn register(&self, exchange: &str, queue: &str, key_pattern: &str) -> Result<(), RabbitMQError>;

    /// 發布原始內容
    async fn publish(&self, exchange: &str, routing_key: &str, body: &[u8]) -> Result<(), RabbitMQError>;

    /// 開始從佇列接收投遞
    async fn consume(&self, queue: &str, consumer: &str, auto_ack: bool) -> Result<DeliveryStream, RabbitMQError>;

    /// 在交易中確認投遞，確認隨提交才生效
    async fn ack(&self, delivery: &QueueDelivery) -> Result<(), RabbitMQError>;

    /// 提交目前的通道交易
    async fn commit(&self) -> Result<(), RabbitMQError>;

    /// 關閉通道與連線
    async fn close(&self) -> Result<(), RabbitMQError>;
}

/// RabbitMQ 客戶端
///
/// 每個實例只開啟一條連線與一個通道，通道在建立時即進入交易模式，
/// 之後每個操作都各自提交為一筆交易。
pub struct RabbitMQClient {
    connection: Connection,
    channel: Channel,
    tx_lock: Mutex<()>,
}

impl RabbitMQClient {
    /// 連線並開啟交易模式的通道
    pub async fn connect(host: &str, user: &str) -> Result<Self, RabbitMQError> {
        let connection = connection::connect(host, user).await?;

        let channel = connection
            .create_channel()
            .await
            .map_err(RabbitMQError::OpenChannel)?;

        channel
            .tx_select()
            .await
            .map_err(RabbitMQError::TransactionMode)?;

        debug!("Channel {} opened in transaction mode", channel.id());

        Ok(Self {
            connection,
            channel,
            tx_lock: Mutex::new(()),
        })
    }

    async fn commit_channel(&self) -> Result<(), RabbitMQError> {
        self.channel.tx_commit().await.map_err(RabbitMQError::Commit)
    }

    /// 執行操作後提交交易，無論操作是否成功都會提交
    async fn in_transaction<T, F, Fut>(&self, operation: F) -> Result<T, RabbitMQError>
    where
        F: FnOnce(Channel) -> Fut,
        Fut: Future<Output = Result<T, RabbitMQError>>,
    {
        let _guard = self.tx_lock.lock().await;

        let result = operation(self.channel.clone()).await;
        let committed = self.commit_channel().await;

        settle(result, committed)
    }
}

/// 合併操作與提交的結果，操作本身的錯誤優先
fn settle<T>(result: Result<T, RabbitMQError>, committed: Result<(), RabbitMQError>) -> Result<T, RabbitMQError> {
    match (result, committed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(commit_err)) => Err(commit_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(commit_err)) => {
            warn!("Commit after failed operation also failed: {}", commit_err);
            Err(err)
        }
    }
}

#[async_trait]
impl QueueClient for RabbitMQClient {
    async fn register(&self, exchange: &str, queue: &str, key_pattern: &str) -> Result<(), RabbitMQError> {
        self.in_transaction(|channel| async move {
            info!("Declaring exchange... | Exchange: {} | Type: topic", exchange);

            channel
                .exchange_declare(
                    exchange,
                    EXCHANGE_KIND,
                    ExchangeDeclareOptions {
                        durable: true,
                        ..ExchangeDeclareOptions::default()
                    },
                    FieldTable::default(),
                )
                .await
                .map_err(|source| RabbitMQError::DeclareExchange {
                    exchange: exchange.to_string(),
                    source,
                })?;

            info!("Declaring queue... | Queue: {}", queue);

            let declared = channel
                .queue_declare(
                    queue,
                    QueueDeclareOptions {
                        durable: true,
                        ..QueueDeclareOptions::default()
                    },
                    FieldTable::default(),
                )
                .await
                .map_err(|source| RabbitMQError::DeclareQueue {
                    queue: queue.to_string(),
                    source,
                })?;

            let queue_name = declared.name().as_str();

            info!(
                "Binding queue to the exchange... | Exchange: {} | Queue: {} | Pattern: {}",
                exchange, queue_name, key_pattern
            );

            channel
                .queue_bind(
                    queue_name,
                    exchange,
                    key_pattern,
                    QueueBindOptions::default(),
                    FieldTable::default(),
                )
                .await
                .map_err(|source| RabbitMQError::BindQueue {
                    queue: queue_name.to_string(),
                    exchange: exchange.to_string(),
                    source,
                })?;

            Ok::<_, RabbitMQError>(())
        })
        .await
    }

    async fn publish(&self, exchange: &str, routing_key: &str, body: &[u8]) -> Result<(), RabbitMQError> {
        self.in_transaction(|channel| async move {
            debug!(
                "Publishing to exchange: {}, routing_key: {}, body: {}",
                exchange,
                routing_key,
                String::from_utf8_lossy(body)
            );

            channel
                .basic_publish(
                    exchange,
                    routing_key,
                    BasicPublishOptions::default(),
                    body,
                    BasicProperties::default().with_content_type(CONTENT_TYPE.into()),
                )
                .await
                .map_err(|source| RabbitMQError::Publish {
                    exchange: exchange.to_string(),
                    source,
                })?;

            Ok::<_, RabbitMQError>(())
        })
        .await
    }

    async fn consume(&self, queue: &str, consumer: &str, auto_ack: bool) -> Result<DeliveryStream, RabbitMQError> {
        self.in_transaction(|channel| async move {
            let deliveries = channel
                .basic_consume(
                    queue,
                    consumer,
                    BasicConsumeOptions {
                        no_ack: auto_ack,
                        ..BasicConsumeOptions::default()
                    },
                    FieldTable::default(),
                )
                .await
                .map_err(|source| RabbitMQError::Consume {
                    queue: queue.to_string(),
                    consumer: consumer.to_string(),
                    source,
                })?;

            let stream = deliveries
                .map(|delivery| {
                    delivery
                        .map(QueueDelivery::from)
                        .map_err(RabbitMQError::Delivery)
                })
                .boxed();

            Ok::<_, RabbitMQError>(stream)
        })
        .await
    }

    async fn ack(&self, delivery: &QueueDelivery) -> Result<(), RabbitMQError> {
        self.in_transaction(|_| delivery.ack()).await
    }

    async fn commit(&self) -> Result<(), RabbitMQError> {
        let _guard = self.tx_lock.lock().await;
        self.commit_channel().await
    }

    async fn close(&self) -> Result<(), RabbitMQError> {
        self.channel
            .close(200, "Bye")
            .await
            .map_err(RabbitMQError::CloseChannel)?;

        self.connection
            .close(200, "Bye")
            .await
            .map_err(RabbitMQError::CloseConnection)?;

        info!("RabbitMQ connection closed");

        Ok(())
    }
}
