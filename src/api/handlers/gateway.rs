use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
};
use tracing::{debug, error, warn};

use crate::messaging::{Message, MessageType, RabbitMQPublisher};

/// 轉發服務的共享狀態
#[derive(Clone)]
pub struct GatewayState {
    pub publisher: RabbitMQPublisher,
    pub exchange: Arc<str>,
}

impl GatewayState {
    pub fn new(publisher: RabbitMQPublisher, exchange: &str) -> Self {
        Self {
            publisher,
            exchange: Arc::from(exchange),
        }
    }
}

/// 將請求內容轉為消息封裝
///
/// 讀取或解析失敗都會產生指定類型的失敗消息，而不是回傳 HTTP 錯誤。
pub fn envelope_from_body(message_type: MessageType, body: Result<Bytes, BytesRejection>) -> Message {
    match body {
        Err(rejection) => {
            warn!("Failed to read {} request body: {}", message_type, rejection);
            Message::typed_failure(message_type, None, rejection)
        }
        Ok(body) => serde_json::from_slice::<Message>(&body).unwrap_or_else(|e| {
            warn!("Failed to parse {} request body: {}", message_type, e);
            Message::typed_failure(message_type, Some(body.as_ref()), e)
        }),
    }
}

async fn forward(
    state: GatewayState,
    message_type: MessageType,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    let message = envelope_from_body(message_type, body);
    debug!("Forwarding message {} to exchange {}", message.id, state.exchange);

    match state.publisher.publish(&state.exchange, &message).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!("Failed to publish message {}: {}", message.id, e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// POST /model
pub async fn model(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    forward(state, MessageType::Model, body).await
}

/// POST /storage
pub async fn storage(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    forward(state, MessageType::File, body).await
}
