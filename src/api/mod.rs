//! Axum HTTP surface: liveness on `/`, chat on `/chatbot`.

pub mod chat;
pub mod status;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the application router with permissive CORS.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::HEAD])
        .allow_headers(Any);

    Router::new()
        .route("/", get(status::status).head(status::status_head))
        .route("/chatbot", post(chat::chatbot))
        .layer(cors)
        .with_state(state)
}
