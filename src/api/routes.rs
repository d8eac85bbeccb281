use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::*;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Journal routes
        .route("/users/:owner/trades", post(record_trade).get(get_trade_history))
        .route("/users/:owner/stats", get(get_stats))
        .route("/users/:owner/dashboard", get(get_dashboard))
        .route(
            "/users/:owner/risk-config",
            get(get_risk_config).put(update_risk_config),
        )

        // WebSocket route
        .route("/users/:owner/ws", get(super::websocket::ws_handler))

        .with_state(state)
}
