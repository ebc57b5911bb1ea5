// server.rs - 示範服務的生命週期管理
//
// - 轉發服務: 將 HTTP 請求內容發布為佇列消息
// - 探針服務: 註冊測試佇列、消費請求消息並提供 /ping

/// 伺服器級別錯誤處理
pub mod error;
/// HTTP 轉發服務
pub mod gateway;
/// 測試探針服務
pub mod probe;

pub use error::{ServerError, ServerResult};
pub use gateway::GatewayServer;
pub use probe::ProbeServer;

use tracing::{error, info};

/// 等待 Ctrl+C，監聽失敗時立即返回
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("接收到關閉信號，正在退出..."),
        Err(err) => error!("無法監聽關閉信號: {}", err),
    }
}
