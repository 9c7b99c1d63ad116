//! Application setup and router configuration.

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::jobs::JobManager;
use crate::server::routes::{
    create_scrape_job, delete_job, get_history, get_job_results, get_job_status, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub manager: JobManager,
}

/// Build the Axum application router.
///
/// The manager owns the job store and the collaborator clients; handlers
/// only validate input and shape responses.
pub fn build_app(manager: JobManager) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/scrape", post(create_scrape_job))
        .route("/scrape/:job_id", delete(delete_job))
        .route("/status/:job_id", get(get_job_status))
        .route("/results/:job_id", get(get_job_results))
        .route("/history", get(get_history))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { manager })
}
