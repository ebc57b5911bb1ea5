// utils.rs - 公共工具模組
//
// 提供序列化相關的輔助函數。

pub mod serde_helpers;

pub use serde_helpers::{base64_bytes, empty_string_as_none};
