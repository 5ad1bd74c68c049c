//! Router assembly shared by the binary and the integration tests.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::panic_response;
use crate::handlers;
use crate::state::AppState;

pub fn build_app(config: &Config) -> Router {
    with_layers(handlers::public::router(), config)
}

/// Wrap `routes` in the body limit, panic guard, CORS and tracing layers and
/// attach the shared state.
pub fn with_layers(routes: Router<AppState>, config: &Config) -> Router {
    let state = AppState::new(config.entitlements.clone());

    let mut app = routes
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state);

    if !config.cors_allowed_origins.is_empty() {
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(config.cors_allowed_origins.clone()))
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE])
            .max_age(Duration::from_secs(60 * 60));
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}
