pub mod logs;
pub mod notifications;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};

pub use state::{AppState, AppStateInner};

/// All HTTP routes. CORS and request tracing are layered on by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/submit", post(notifications::submit_notification))
        .route("/logs", get(logs::get_logs).delete(logs::delete_logs))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> axum::Json<herald_types::api::HealthResponse> {
    axum::Json(herald_types::api::HealthResponse { status: "ok" })
}
