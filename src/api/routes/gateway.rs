// src/api/routes/gateway.rs
use axum::{routing::post, Router};

use crate::api::handlers::gateway::{self, GatewayState};

pub fn routes(state: GatewayState) -> Router {
    Router::new()
        .route("/model", post(gateway::model))
        .route("/storage", post(gateway::storage))
        .with_state(state)
}
