use axum::extract::State;
use axum::Json;

use crate::models::StatusResponse;
use crate::state::AppState;

/// GET / - Liveness check; never touches the pipeline.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active".to_string(),
        message: Some(format!(
            "{} Chatbot is Awake! 🚀",
            state.config.assistant_name
        )),
    })
}

/// HEAD / - Uptime pings.
pub async fn status_head() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active".to_string(),
        message: None,
    })
}
