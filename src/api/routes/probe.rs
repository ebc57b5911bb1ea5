// src/api/routes/probe.rs
use axum::{routing::get, Router};

use crate::api::handlers::probe::{self, ProbeState};

pub fn routes(state: ProbeState) -> Router {
    Router::new()
        .route("/ping", get(probe::ping).post(probe::ping))
        .with_state(state)
}
