use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, with_security_headers, Config};
use crate::handlers::{
    check_in_manual, check_in_scan, health_check, inspect_qr, register_participant,
};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/events/:event_id/participants",
            post(register_participant),
        )
        .route("/api/events/:event_id/check-in", post(check_in_scan))
        .route("/api/events/:event_id/check-in/manual", post(check_in_manual))
        .route("/api/qr/inspect", post(inspect_qr))
        .with_state(state);

    with_security_headers(router, config.production)
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}
