/// 配置管理模組
///
/// 本模組負責加載、驗證和管理系統配置。
/// 預設值、環境配置檔、`.env` 與環境變數依序疊加。
// 宣告子模組
pub mod loader;
pub mod manager;
pub mod types;
pub mod validation;

// 重新導出常用組件
pub use loader::{ConfigLoader, Environment};
pub use manager::load_config;
pub use types::*;
pub use validation::{ValidationError, ValidationUtils, Validator};

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_exports() {
        let _ = super::Environment::Development;
        let _ = super::ValidationUtils::required("test", "field");

        fn _ensure_config_works(cfg: &super::ApplicationConfig) {
            let _ = &cfg.log;
            let _ = &cfg.rabbitmq;
            let _ = &cfg.gateway;
            let _ = &cfg.probe;
        }

        use super::Validator;
        assert!(super::ApplicationConfig::default().validate().is_ok());
    }
}
