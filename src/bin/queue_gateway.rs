use anyhow::Result;
use clap::Parser;
use queue_bridge::config::{self, Environment};
use queue_bridge::monitor::init_logging;
use queue_bridge::server::{shutdown_signal, GatewayServer};
use std::path::PathBuf;
use tracing::info;

/// 將 HTTP 請求內容發布到 RabbitMQ 的轉發服務
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 配置檔目錄
    #[arg(long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// 執行環境 (development / production)
    #[arg(long, env = "QUEUE_BRIDGE_ENV", default_value = "development")]
    env: String,

    /// 提供 HOST 與 USER 的 .env 檔
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化配置
    let app_config = config::load_config(
        &args.config_dir,
        Environment::parse(&args.env),
        Some(args.dotenv.as_path()),
    )?;

    // 初始化日誌系統
    let _log_guard = init_logging(&app_config.log)?;

    let server = GatewayServer::connect(&app_config.rabbitmq, app_config.gateway.clone()).await?;

    info!("轉發服務初始化完成，等待請求...");
    server.run(shutdown_signal()).await?;

    Ok(())
}
