use anyhow::Result;
use clap::Parser;
use queue_bridge::config::{self, Environment};
use queue_bridge::monitor::init_logging;
use queue_bridge::server::{shutdown_signal, ProbeServer};
use std::path::PathBuf;
use tracing::info;

/// 註冊測試佇列並提供 /ping 的探針服務
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

    let app_config = config::load_config(
        &args.config_dir,
        Environment::parse(&args.env),
        Some(args.dotenv.as_path()),
    )?;

    let _log_guard = init_logging(&app_config.log)?;

    // 任何啟動步驟失敗都直接結束程式
    let server = ProbeServer::connect(&app_config.rabbitmq, app_config.probe.clone()).await?;

    info!("探針服務初始化完成");
    server.run(shutdown_signal()).await?;

    Ok(())
}
