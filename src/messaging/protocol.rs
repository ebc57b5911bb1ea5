use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::utils::serde_helpers::base64_bytes;

/// 消息意圖
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// 請求
    Request,
    /// 處理成功
    Success,
    /// 處理失敗
    Failure,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Request => "request",
            Intent::Success => "success",
            Intent::Failure => "failure",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 消息類型，決定路由分類
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// 資料模型
    Model,
    /// 檔案儲存
    File,
    /// 無法辨識的類型
    #[serde(other)]
    Unknown,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Model => "model",
            MessageType::File => "file",
            MessageType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 消息所代表的操作
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    #[serde(other)]
    Unknown,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 消息封裝，生產者與消費者之間以 JSON 傳輸
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// 消息識別碼
    pub id: String,
    /// 消息意圖
    pub intent: Intent,
    /// 消息類型
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// 子類型
    #[serde(default)]
    pub subtype: String,
    /// 操作類型
    #[serde(default = "default_operation")]
    pub operation: Operation,
    /// 消息載荷
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
    /// 錯誤資訊，僅在失敗消息中出現
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_operation() -> Operation {
    Operation::Unknown
}

impl Message {
    /// 創建新消息
    pub fn new(
        id: impl Into<String>,
        intent: Intent,
        message_type: MessageType,
        subtype: impl Into<String>,
        operation: Operation,
        data: Vec<u8>,
        error: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            intent,
            message_type,
            subtype: subtype.into(),
            operation,
            data,
            error,
        }
    }

    /// 無法解析的原始內容所對應的失敗消息
    pub fn read_failure(body: &[u8], err: impl fmt::Display) -> Self {
        Self::typed_failure(MessageType::Unknown, Some(body), err)
    }

    /// 指定類型的失敗消息，`body` 為 `None` 表示內容根本無法讀取
    pub fn typed_failure(
        message_type: MessageType,
        body: Option<&[u8]>,
        err: impl fmt::Display,
    ) -> Self {
        Self::new(
            Uuid::new_v4().to_string(),
            Intent::Failure,
            message_type,
            "",
            Operation::Unknown,
            body.map(<[u8]>::to_vec).unwrap_or_default(),
            Some(err.to_string()),
        )
    }

    /// 主題交換機使用的路由鍵: `{id}.{intent}.{type}.{subtype}.{operation}`
    ///
    /// `id` 中的 `.` 會換成 `_`，意圖與類型固定落在第二與第三段。
    pub fn routing_key(&self) -> String {
        format!(
            "{}.{}.{}.{}.{}",
            self.id.replace('.', "_"),
            self.intent,
            self.message_type,
            self.subtype,
            self.operation
        )
    }

    /// 是否為失敗消息
    pub fn is_failure(&self) -> bool {
        self.intent == Intent::Failure
    }

    /// 序列化為傳輸用的 JSON
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// 從投遞內容還原消息，內容無效時回傳失敗消息而非錯誤
    pub fn from_delivery(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|err| Self::read_failure(body, err))
    }
}

/// 佇列名稱: `{origin}:{intent}`
pub fn queue_name(origin: &str, intent: Intent) -> String {
    format!("{}:{}", origin, intent)
}

/// 消費者名稱: `{origin}:{intent}`
pub fn consumer_name(origin: &str, intent: Intent) -> String {
    format!("{}:{}", origin, intent)
}

/// 綁定某意圖所有消息的主題模式，對應 [`Message::routing_key`] 的第二段
pub fn topic_pattern(intent: Intent) -> String {
    format!("*.{}.#", intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// 主題交換機的比對規則: `*` 恰好一段，`#` 零或多段
    fn topic_matches(pattern: &[&str], key: &[&str]) -> bool {
        match (pattern.split_first(), key.split_first()) {
            (None, None) => true,
            (Some((&"#", rest)), _) => {
                topic_matches(rest, key) || (!key.is_empty() && topic_matches(pattern, &key[1..]))
            }
            (Some((word, rest)), Some((head, tail))) => {
                (*word == "*" || word == head) && topic_matches(rest, tail)
            }
            _ => false,
        }
    }

    fn binds(pattern: &str, routing_key: &str) -> bool {
        let pattern: Vec<_> = pattern.split('.').collect();
        let key: Vec<_> = routing_key.split('.').collect();
        topic_matches(&pattern, &key)
    }

    fn sample() -> Message {
        Message::new(
            "id124",
            Intent::Request,
            MessageType::Model,
            "group",
            Operation::Create,
            br#"{"foo": "bar"}"#.to_vec(),
            None,
        )
    }

    #[test]
    fn test_json_round_trip() {
        let message = sample();
        let raw = message.to_json().unwrap();
        assert_eq!(Message::from_delivery(&raw), message);

        let failure = Message::typed_failure(MessageType::File, Some(b"\x00\xff"), "boom");
        let raw = failure.to_json().unwrap();
        assert_eq!(Message::from_delivery(&raw), failure);
    }

    #[test]
    fn test_wire_format() {
        let json: serde_json::Value = serde_json::from_slice(&sample().to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "id124",
                "intent": "request",
                "type": "model",
                "subtype": "group",
                "operation": "create",
                "data": "eyJmb28iOiAiYmFyIn0=",
            })
        );
    }

    #[test]
    fn test_routing_key() {
        assert_eq!(sample().routing_key(), "id124.request.model.group.create");

        let ping = Message::new(
            "pingid",
            Intent::Request,
            MessageType::Model,
            "ping",
            Operation::Unknown,
            Vec::new(),
            None,
        );
        assert_eq!(ping.routing_key(), "pingid.request.model.ping.unknown");
    }

    #[rstest]
    #[case::not_json(b"not json".as_slice())]
    #[case::empty(b"".as_slice())]
    #[case::wrong_shape(br#"{"id": 12}"#.as_slice())]
    #[case::bad_intent(br#"{"id": "a", "intent": "maybe", "type": "model"}"#.as_slice())]
    fn test_malformed_delivery_becomes_failure(#[case] body: &[u8]) {
        let message = Message::from_delivery(body);
        assert!(message.is_failure());
        assert_eq!(message.message_type, MessageType::Unknown);
        assert_eq!(message.operation, Operation::Unknown);
        assert_eq!(message.data, body);
        assert!(message.error.is_some());
        assert!(Uuid::parse_str(&message.id).is_ok());
    }

    #[test]
    fn test_unknown_type_and_operation_fall_back() {
        let body = br#"{"id": "x", "intent": "success", "type": "video", "operation": "archive"}"#;
        let message = Message::from_delivery(body);
        assert_eq!(message.intent, Intent::Success);
        assert_eq!(message.message_type, MessageType::Unknown);
        assert_eq!(message.operation, Operation::Unknown);
        assert_eq!(message.subtype, "");
        assert!(message.data.is_empty());
        assert!(message.error.is_none());
    }

    #[test]
    fn test_typed_failure_without_body() {
        let message = Message::typed_failure(MessageType::Model, None, "connection reset");
        assert_eq!(message.intent, Intent::Failure);
        assert_eq!(message.message_type, MessageType::Model);
        assert!(message.data.is_empty());
        assert_eq!(message.error.as_deref(), Some("connection reset"));
    }

    #[rstest]
    #[case(Intent::Request, "request")]
    #[case(Intent::Success, "success")]
    #[case(Intent::Failure, "failure")]
    fn test_naming_helpers(#[case] intent: Intent, #[case] name: &str) {
        assert_eq!(queue_name("queue-test", intent), format!("queue-test:{}", name));
        assert_eq!(consumer_name("queue-test", intent), format!("queue-test:{}", name));
        assert_eq!(topic_pattern(intent), format!("*.{}.#", name));
    }

    #[rstest]
    #[case::plain("user-7")]
    #[case::dotted("user.7")]
    #[case::only_dots("...")]
    fn test_routing_key_keeps_intent_position(#[case] id: &str) {
        let message = Message::new(id, Intent::Request, MessageType::Model, "group", Operation::Create, Vec::new(), None);
        let key = message.routing_key();

        assert_eq!(key.split('.').count(), 5);
        assert!(binds(&topic_pattern(Intent::Request), &key));
        assert!(binds("*.request.model.#", &key));
        assert!(!binds(&topic_pattern(Intent::Success), &key));
    }

    #[test]
    fn test_dotted_id_is_escaped_in_key_only() {
        let message = Message::new("user.7", Intent::Failure, MessageType::File, "avatar", Operation::Delete, Vec::new(), None);
        assert_eq!(message.routing_key(), "user_7.failure.file.avatar.delete");
        assert_eq!(message.id, "user.7");
    }
}
