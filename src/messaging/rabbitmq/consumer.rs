use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::messaging::protocol::{self, Intent, Message};
use crate::messaging::rabbitmq::client::{DeliveryStream, QueueClient, RabbitMQClient};
use crate::messaging::rabbitmq::error::RabbitMQError;

/// 消息處理器特徵
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: Message);
}

#[async_trait]
impl<F> MessageHandler for F
where
    F: Fn(Message) + Send + Sync,
{
    async fn handle(&self, message: Message) {
        self(message)
    }
}

/// 消息消費者
///
/// 每個消費者綁定一個來源與意圖，並在單一背景任務中依序處理投遞。
pub struct RabbitMQConsumer {
    client: Arc<dyn QueueClient>,
    name: String,
    queue_name: String,
    running_task: Option<JoinHandle<()>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl RabbitMQConsumer {
    /// 以既有客戶端創建消費者，並註冊意圖對應的交換機與佇列
    pub async fn new(
        client: Arc<dyn QueueClient>,
        origin: &str,
        intent: Intent,
    ) -> Result<Self, RabbitMQError> {
        let queue_name = protocol::queue_name(origin, intent);
        let key_pattern = protocol::topic_pattern(intent);

        client
            .register(intent.as_str(), &queue_name, &key_pattern)
            .await
            .map_err(|e| RabbitMQError::register(queue_name.clone(), e))?;

        let name = protocol::consumer_name(origin, intent);
        info!(
            "Initializing the Queue Consumer... | Name: {} | Queue: {}",
            name, queue_name
        );

        Ok(Self {
            client,
            name,
            queue_name,
            running_task: None,
            shutdown_tx: None,
        })
    }

    /// 連線並創建消費者
    pub async fn connect(
        host: &str,
        user: &str,
        origin: &str,
        intent: Intent,
    ) -> Result<Self, RabbitMQError> {
        let client = RabbitMQClient::connect(host, user).await?;
        Self::new(Arc::new(client), origin, intent).await
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// 開始消費消息，每條消息都交給 `handler` 處理
    pub async fn consume(
        &mut self,
        auto_ack: bool,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<(), RabbitMQError> {
        if self.is_running() {
            warn!("Consumer {} is already running", self.name);
            return Ok(());
        }

        // 串流已結束的舊任務可直接回收
        self.running_task = None;

        let deliveries = self
            .client
            .consume(&self.queue_name, &self.name, auto_ack)
            .await?;

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        self.shutdown_tx = Some(shutdown_tx);

        let name = self.name.clone();
        let client = self.client.clone();
        let task = tokio::spawn(async move {
            info!("Consumer started: {}", name);

            Self::consume_messages(client, deliveries, handler, auto_ack, shutdown_rx).await;

            info!("Consumer stopped: {}", name);
        });

        self.running_task = Some(task);

        Ok(())
    }

    async fn consume_messages(
        client: Arc<dyn QueueClient>,
        mut deliveries: DeliveryStream,
        handler: Arc<dyn MessageHandler>,
        auto_ack: bool,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Closing consumer connection");
                    break;
                }

                next = deliveries.next() => {
                    match next {
                        Some(Ok(delivery)) => {
                            debug!(
                                "Received delivery {} with routing_key: {}",
                                delivery.delivery_tag, delivery.routing_key
                            );

                            let message = Message::from_delivery(&delivery.body);
                            if let Some(err) = message.error.as_deref().filter(|_| message.is_failure()) {
                                warn!("Delivery {} carries a failure message: {}", delivery.delivery_tag, err);
                            }

                            handler.handle(message).await;

                            if !auto_ack {
                                if let Err(e) = client.ack(&delivery).await {
                                    error!("Failed to acknowledge message: {}", e);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            error!("Error receiving message: {}", e);
                        }
                        None => {
                            debug!("Delivery stream closed");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// 停止消費並等待背景任務結束
    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(()).await;

            if let Some(task) = self.running_task.take() {
                if let Err(e) = task.await {
                    error!("Error waiting for consumer task: {}", e);
                }
            }
        }
    }

    /// 背景任務是否仍在執行
    pub fn is_running(&self) -> bool {
        matches!(&self.running_task, Some(task) if !task.is_finished())
    }

    /// 關閉底層連線
    pub async fn close(&mut self) -> Result<(), RabbitMQError> {
        self.stop().await;
        self.client.close().await
    }
}
