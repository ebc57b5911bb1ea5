mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::RecordingClient;
use queue_bridge::api::handlers::gateway::GatewayState;
use queue_bridge::api::routes::gateway_routes;
use queue_bridge::messaging::{Intent, Message, MessageType, Operation, RabbitMQPublisher};
use tower::ServiceExt;

fn app(client: Arc<RecordingClient>) -> Router {
    let publisher = RabbitMQPublisher::new(client);
    gateway_routes(GatewayState::new(publisher, "main"))
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_model_envelope_is_published_unchanged() {
    let client = RecordingClient::new();
    let message = Message::new(
        "user-7",
        Intent::Request,
        MessageType::Model,
        "group",
        Operation::Create,
        br#"{"name": "choir"}"#.to_vec(),
        None,
    );

    let response = app(client.clone())
        .oneshot(post("/model", message.to_json().unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let published = client.published();
    assert_eq!(published.len(), 1);
    let (exchange, routing_key, body) = &published[0];
    assert_eq!(exchange, "main");
    assert_eq!(routing_key, "user-7.request.model.group.create");
    assert_eq!(Message::from_delivery(body), message);
}

#[tokio::test]
async fn test_malformed_model_body_publishes_failure() {
    let client = RecordingClient::new();

    let response = app(client.clone())
        .oneshot(post("/model", "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let published = client.published();
    assert_eq!(published.len(), 1);
    let (exchange, routing_key, body) = &published[0];
    let failure = Message::from_delivery(body);

    assert_eq!(exchange, "main");
    assert_eq!(failure.intent, Intent::Failure);
    assert_eq!(failure.message_type, MessageType::Model);
    assert_eq!(failure.data, b"{not json");
    assert!(failure.error.is_some());
    assert_eq!(routing_key, &failure.routing_key());
}

#[tokio::test]
async fn test_malformed_storage_body_is_file_failure() {
    let client = RecordingClient::new();

    let response = app(client.clone())
        .oneshot(post("/storage", "[]"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, routing_key, body) = &client.published()[0];
    let failure = Message::from_delivery(body);
    assert_eq!(failure.message_type, MessageType::File);
    assert!(routing_key.contains(".failure.file."));
}

#[tokio::test]
async fn test_unreadable_body_publishes_failure_without_data() {
    let client = RecordingClient::new();

    // 超過預設的請求大小上限，讀取會失敗
    let oversized = vec![b'x'; 3 * 1024 * 1024];
    let response = app(client.clone())
        .oneshot(post("/model", oversized))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, _, body) = &client.published()[0];
    let failure = Message::from_delivery(body);
    assert_eq!(failure.intent, Intent::Failure);
    assert_eq!(failure.message_type, MessageType::Model);
    assert!(failure.data.is_empty());
    assert!(failure.error.is_some());
}

#[tokio::test]
async fn test_publish_failure_returns_service_unavailable() {
    let client = RecordingClient::failing();

    let response = app(client.clone())
        .oneshot(post("/storage", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(client.published().is_empty());
}

#[tokio::test]
async fn test_only_post_is_routed() {
    let client = RecordingClient::new();

    let request = Request::builder().uri("/model").body(Body::empty()).unwrap();
    let response = app(client.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app(client.clone())
        .oneshot(post("/unknown", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(client.published().is_empty());
}
