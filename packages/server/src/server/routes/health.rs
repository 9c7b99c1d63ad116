use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    jobs: usize,
}

/// Health check endpoint
///
/// The service is healthy whenever it can answer; the job count gives a
/// quick view of in-memory state.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        jobs: state.manager.history().await.len(),
    })
}
