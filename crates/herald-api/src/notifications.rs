use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, warn};

use herald_types::api::{SubmitNotificationRequest, SubmitNotificationResponse};

use crate::state::AppState;

pub async fn submit_notification(
    State(state): State<AppState>,
    payload: Result<Json<SubmitNotificationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, StatusCode> {
    let Json(req) = payload.map_err(|e| {
        warn!("Invalid request body: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    // Notifiers and the log file block, so run the whole fan-out off the async runtime
    let app = state.clone();
    let logs = tokio::task::spawn_blocking(move || app.engine.send(&req.category, &req.message))
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| {
            error!("Failed to send notification: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(SubmitNotificationResponse {
        message: "Notification sent successfully".to_string(),
        logs,
    }))
}
