use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use herald_store::StoreError;

use crate::state::AppState;

/// A store that was never written (or was just cleared) is a 404, not an empty list.
fn store_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Unavailable { .. } => {
            error!("Log store error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn get_logs(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let app = state.clone();
    let logs = tokio::task::spawn_blocking(move || app.engine.list_logs())
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| store_status(&e))?;

    Ok(Json(logs))
}

pub async fn delete_logs(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let app = state.clone();
    tokio::task::spawn_blocking(move || app.engine.clear_logs())
        .await
        .map_err(|e| { error!("spawn_blocking join error: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?
        .map_err(|e| store_status(&e))?;

    Ok(StatusCode::NO_CONTENT)
}
