mod premium;

pub use premium::*;

use axum::{
    Json, Router,
    routing::{MethodRouter, get, post},
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn premium() -> MethodRouter<AppState> {
    post(redeem_or_verify).fallback(method_not_allowed)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/premium", premium())
        // Paths the deployed planner client already calls
        .route("/.netlify/functions/validate-premium", premium())
        .route("/.netlify/functions/verify-premium", premium())
}
