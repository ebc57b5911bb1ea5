use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use tracing::{error, info};

use crate::messaging::{Intent, Message, MessageType, Operation, RabbitMQPublisher};

/// 探針服務的共享狀態
#[derive(Clone)]
pub struct ProbeState {
    pub publisher: RabbitMQPublisher,
    pub exchange: Arc<str>,
}

impl ProbeState {
    pub fn new(publisher: RabbitMQPublisher, exchange: &str) -> Self {
        Self {
            publisher,
            exchange: Arc::from(exchange),
        }
    }
}

/// `/ping` 發布的固定測試消息
pub fn ping_message() -> Message {
    Message::new(
        "pingid",
        Intent::Request,
        MessageType::Model,
        "ping",
        Operation::Unknown,
        Vec::new(),
        None,
    )
}

/// 建立資料模型的請求消息
pub fn model_request(id: &str, subtype: &str, data: &str) -> Message {
    Message::new(
        id,
        Intent::Request,
        MessageType::Model,
        subtype,
        Operation::Create,
        data.as_bytes().to_vec(),
        None,
    )
}

/// 記錄收到的消息
pub fn log_received(message: Message) {
    info!(
        "Received message || key: {} || type: {} || subtype: {} || intent: {} || operation: {} || data: {}",
        message.routing_key(),
        message.message_type,
        message.subtype,
        message.intent,
        message.operation,
        String::from_utf8_lossy(&message.data)
    );
}

/// GET|POST /ping
pub async fn ping(State(state): State<ProbeState>) -> StatusCode {
    info!("sending msg");

    match state.publisher.publish(&state.exchange, &ping_message()).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!("Failed to publish ping message: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
