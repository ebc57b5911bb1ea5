// api.rs - API服務模組，宣告子模組
//
// 兩個示範 HTTP 服務的對外接口：
// - 轉發服務: POST /model、POST /storage
// - 探針服務: /ping

/// REST 服務組裝與啟動
pub mod rest;
/// API路由定義
pub mod routes;
/// API處理器模組
pub mod handlers;
