use serde::{Deserialize, Serialize};

use crate::models::LogRecord;

// -- Notifications --

/// The category stays a raw string: an unknown category is not a bad request,
/// it just reaches nobody.
#[derive(Debug, Deserialize)]
pub struct SubmitNotificationRequest {
    pub category: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitNotificationResponse {
    pub message: String,
    pub logs: Vec<LogRecord>,
}

// -- Health --

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
