use std::future::Future;

use tracing::{error, info};

use crate::api::handlers::gateway::GatewayState;
use crate::api::rest::RestApi;
use crate::api::routes::gateway_routes;
use crate::config::{GatewayConfig, RabbitMQConfig};
use crate::messaging::RabbitMQPublisher;
use crate::server::ServerResult;

/// HTTP 轉發服務
pub struct GatewayServer {
    config: GatewayConfig,
    publisher: RabbitMQPublisher,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, publisher: RabbitMQPublisher) -> Self {
        Self { config, publisher }
    }

    /// 連線到 RabbitMQ 並建立服務
    pub async fn connect(rabbitmq: &RabbitMQConfig, config: GatewayConfig) -> ServerResult<Self> {
        let publisher = RabbitMQPublisher::connect(&rabbitmq.host, &rabbitmq.user).await?;
        Ok(Self::new(config, publisher))
    }

    pub fn state(&self) -> GatewayState {
        GatewayState::new(self.publisher.clone(), &self.config.exchange)
    }

    /// 服務請求直到 `shutdown` 完成，之後關閉連線
    pub async fn run<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let api = RestApi::new(&self.config.host, self.config.port, self.config.request_timeout_secs)?;

        info!(
            "Gateway forwarding to exchange '{}' on {}",
            self.config.exchange,
            api.addr()
        );

        let served = api.serve(gateway_routes(self.state()), shutdown).await;

        if let Err(e) = self.publisher.close().await {
            error!("Failed to close publisher: {}", e);
        }

        served
    }
}
