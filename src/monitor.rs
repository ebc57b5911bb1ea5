// monitor.rs - 監控模組
//
// 目前只負責日誌系統的初始化。

pub mod logger;

pub use logger::init_logging;
