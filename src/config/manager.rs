use config::ConfigError;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::loader::{ConfigLoader, Environment};
use crate::config::types::ApplicationConfig;
use crate::config::validation::Validator;

/// 載入應用程序配置（在應用程序啟動時調用）
pub fn load_config(
    config_dir: &Path,
    env: Environment,
    dotenv: Option<&Path>,
) -> Result<ApplicationConfig, ConfigError> {
    debug!("從 {} 加載 {:?} 配置", config_dir.display(), env);
    ApplicationConfig::load_from(config_dir, env, dotenv)
}

/// ApplicationConfig 加載方法實現
impl ApplicationConfig {
    /// 從指定目錄加載配置
    pub fn load_from(config_dir: &Path, env: Environment, dotenv: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_config(ConfigLoader::load_from(config_dir, env, dotenv)?)
    }

    fn from_config(source: config::Config) -> Result<Self, ConfigError> {
        let app_config: ApplicationConfig = source.try_deserialize()?;

        // 驗證失敗只記錄警告
        if let Err(err) = app_config.validate() {
            warn!("配置驗證失敗: {}", err);
        } else {
            debug!("配置驗證通過");
        }

        Ok(app_config)
    }
}
