// src/api/rest.rs
use axum::Router;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::info;

use crate::server::{ServerError, ServerResult};

#[derive(Debug)]
pub struct RestApi {
    addr: SocketAddr,
    request_timeout: Duration,
}

impl RestApi {
    pub fn new(host: &str, port: u16, request_timeout_secs: u64) -> ServerResult<Self> {
        let ip = host
            .parse::<IpAddr>()
            .map_err(|e| ServerError::Config(format!("無效的監聽位址 {}: {}", host, e)))?;

        Ok(Self {
            addr: SocketAddr::from((ip, port)),
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// 為路由加上追蹤與超時中間件
    pub fn build_app(&self, routes: Router) -> Router {
        routes
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(TimeoutLayer::new(self.request_timeout))
    }

    /// 啟動服務直到 `shutdown` 完成
    pub async fn serve<F>(self, routes: Router, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build_app(routes);
        let listener = TcpListener::bind(self.addr).await?;

        info!("Server listening on {}", self.addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server on {} stopped", self.addr);

        Ok(())
    }
}
