// utils/serde_helpers.rs - 序列化與反序列化輔助函數
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serializer};

/// 以 base64 字串序列化位元組載荷
///
/// 空載荷序列化為 `null`，反序列化時 `null` 或缺少欄位都還原為空載荷，
/// 因此空與缺少在線路格式上是同一件事。
///
/// # 使用範例
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Envelope {
///     #[serde(with = "queue_bridge::utils::serde_helpers::base64_bytes", default)]
///     data: Vec<u8>,
/// }
///
/// let json = serde_json::to_string(&Envelope { data: b"hi".to_vec() }).unwrap();
/// assert_eq!(json, r#"{"data":"aGk="}"#);
/// ```
pub mod base64_bytes {
    use super::*;

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if bytes.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.serialize_str(&STANDARD.encode(bytes))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

/// 將空字符串反序列化為None
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}
