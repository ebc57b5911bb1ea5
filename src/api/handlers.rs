/// 轉發服務處理器
pub mod gateway;
/// 探針服務處理器
pub mod probe;
