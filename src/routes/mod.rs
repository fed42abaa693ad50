//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the REST session API and the per-session websocket under one Axum
//! router. Every request is traced; CORS is open so a browser shell served
//! from elsewhere can drive sessions.

pub mod sessions;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/panels", get(sessions::list_panels))
        .route("/api/sessions", post(sessions::create_session))
        .route(
            "/api/sessions/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/api/sessions/{id}/commands", post(sessions::post_command))
        .route("/api/sessions/{id}/metrics", get(sessions::get_metrics))
        .route("/api/sessions/{id}/overlay", get(sessions::get_overlay))
        .route("/api/sessions/{id}/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
