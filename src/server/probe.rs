use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::api::handlers::probe::{log_received, model_request, ProbeState};
use crate::api::rest::RestApi;
use crate::api::routes::probe_routes;
use crate::config::{ProbeConfig, RabbitMQConfig};
use crate::messaging::{Intent, QueueClient, RabbitMQClient, RabbitMQConsumer, RabbitMQPublisher};
use crate::server::ServerResult;

/// 探針啟動時註冊的佇列與主題模式
pub const TEST_BINDINGS: [(&str, &str); 3] = [
    ("model-req", "*.request.model.#"),
    ("model-res", "*.success.model.#"),
    ("model-res", "*.failure.model.#"),
];

/// 測試探針服務
///
/// 啟動時註冊測試佇列、開始消費請求消息並發布一筆範例請求，
/// 之後透過 `/ping` 發布固定的測試消息。
pub struct ProbeServer {
    config: ProbeConfig,
    admin: Arc<dyn QueueClient>,
    consumer: RabbitMQConsumer,
    publisher: RabbitMQPublisher,
}

impl ProbeServer {
    /// 為註冊、消費與發布各自開啟一條連線
    pub async fn connect(rabbitmq: &RabbitMQConfig, config: ProbeConfig) -> ServerResult<Self> {
        let admin = RabbitMQClient::connect(&rabbitmq.host, &rabbitmq.user).await?;
        let consumer_client = RabbitMQClient::connect(&rabbitmq.host, &rabbitmq.user).await?;
        let publisher = RabbitMQPublisher::connect(&rabbitmq.host, &rabbitmq.user).await?;

        Self::start(config, Arc::new(admin), Arc::new(consumer_client), publisher).await
    }

    /// 執行啟動流程
    pub async fn start(
        config: ProbeConfig,
        admin: Arc<dyn QueueClient>,
        consumer_client: Arc<dyn QueueClient>,
        publisher: RabbitMQPublisher,
    ) -> ServerResult<Self> {
        for (queue, pattern) in TEST_BINDINGS {
            admin.register(&config.exchange, queue, pattern).await?;
        }

        let mut consumer = RabbitMQConsumer::new(consumer_client, &config.origin, Intent::Request).await?;
        consumer.consume(true, Arc::new(log_received)).await?;

        let sample = model_request("id124", "group", r#"{"foo": "bar"}"#);
        publisher.publish(Intent::Request.as_str(), &sample).await?;
        info!("Published sample request {}", sample.routing_key());

        Ok(Self {
            config,
            admin,
            consumer,
            publisher,
        })
    }

    pub fn state(&self) -> ProbeState {
        ProbeState::new(self.publisher.clone(), &self.config.exchange)
    }

    pub fn consumer(&self) -> &RabbitMQConsumer {
        &self.consumer
    }

    /// 服務 `/ping` 直到 `shutdown` 完成，之後停止消費並關閉連線
    pub async fn run<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let api = RestApi::new(&self.config.host, self.config.port, self.config.request_timeout_secs)?;

        info!("Test server listening to {}", api.addr());

        let served = api.serve(probe_routes(self.state()), shutdown).await;
        self.shutdown().await;

        served
    }

    /// 停止消費並關閉所有連線，錯誤只記錄不返回
    pub async fn shutdown(mut self) {
        if let Err(e) = self.consumer.close().await {
            error!("Failed to close consumer: {}", e);
        }
        if let Err(e) = self.publisher.close().await {
            error!("Failed to close publisher: {}", e);
        }
        if let Err(e) = self.admin.close().await {
            error!("Failed to close client: {}", e);
        }
    }
}
