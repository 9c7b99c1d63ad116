//! Scrape job endpoints: create, poll, fetch results, history, delete.
//!
//! Validation lives here at the boundary; nothing malformed ever reaches
//! the job manager. Every body uses the `{ message, data }` envelope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use crate::kernel::jobs::{Job, JobStatus, Listing};
use crate::server::app::AppState;

const THEME_MIN_LEN: usize = 3;
const THEME_MAX_LEN: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    theme: String,
}

/// Standard response envelope: `{ message, data }`.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    message: String,
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<Value> {
    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobData {
    job_id: Uuid,
    status: JobStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsData {
    listings: Option<Vec<Listing>>,
    status: JobStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    job_id: Uuid,
    theme: String,
    listings: Vec<Listing>,
}

fn validate_theme(theme: &str) -> Result<(), &'static str> {
    if theme.is_empty() {
        return Err("Theme cannot be empty");
    }
    // the bounds are character counts, not byte length - whitespace is
    // allowed and may be multi-byte
    let length = theme.chars().count();
    if length < THEME_MIN_LEN {
        return Err("Theme must be at least 3 characters long");
    }
    if length > THEME_MAX_LEN {
        return Err("Theme cannot exceed 50 characters");
    }
    if !theme
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        return Err("Theme should only contain letters and spaces");
    }
    Ok(())
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(message.to_string())),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Job not found")),
    )
        .into_response()
}

/// POST /scrape - create a scrape job, return its id without waiting.
pub async fn create_scrape_job(
    State(state): State<AppState>,
    Json(body): Json<ScrapeRequest>,
) -> Response {
    if let Err(message) = validate_theme(&body.theme) {
        return bad_request(message);
    }

    match state.manager.create_job(&body.theme).await {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(ApiResponse::ok(
                "Scrape job created successfully",
                CreateJobData {
                    job_id,
                    status: JobStatus::Pending,
                },
            )),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to create scrape job");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create scrape job")),
            )
                .into_response()
        }
    }
}

/// GET /status/:job_id - current job snapshot.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let Ok(id) = job_id.parse::<Uuid>() else {
        return bad_request("Invalid job ID format");
    };

    match state.manager.job_status(id).await {
        Some(job) => Json(ApiResponse::<Job>::ok("Job retrieved successfully", job)).into_response(),
        None => not_found(),
    }
}

/// GET /results/:job_id - whatever listings the job currently holds.
pub async fn get_job_results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let Ok(id) = job_id.parse::<Uuid>() else {
        return bad_request("Invalid job ID format");
    };

    match state.manager.job_results(id).await {
        Some((listings, status)) => Json(ApiResponse::ok(
            "Listings retrieved successfully",
            ResultsData { listings, status },
        ))
        .into_response(),
        None => not_found(),
    }
}

/// DELETE /scrape/:job_id - best-effort deletion.
///
/// Malformed and unknown ids are silently ignored; a running pipeline is
/// not stopped, its final write just finds no record.
pub async fn delete_job(State(state): State<AppState>, Path(job_id): Path<String>) -> StatusCode {
    if let Ok(id) = job_id.parse::<Uuid>() {
        state.manager.delete_job(id).await;
    }
    StatusCode::OK
}

/// GET /history - every known job, completed or not.
pub async fn get_history(State(state): State<AppState>) -> Response {
    let entries: Vec<HistoryEntry> = state
        .manager
        .history()
        .await
        .into_iter()
        .map(|job| HistoryEntry {
            job_id: job.id,
            theme: job.theme,
            listings: job.listings.unwrap_or_default(),
        })
        .collect();

    Json(ApiResponse::ok(
        "Job history retrieved successfully",
        entries,
    ))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::jobs::JobManager;
    use crate::kernel::test_dependencies::{MockCatalogScraper, MockEnricher, MockNotifier};
    use crate::server::build_app;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_manager() -> JobManager {
        let listing = Listing::new(
            "The Sea Garden",
            "Jane Doe",
            "https://catalog.test/sea-garden",
            "A novel about gardens.",
            20.0,
        );
        JobManager::new(
            Arc::new(MockCatalogScraper::new().with_listings(vec![listing])),
            Arc::new(MockEnricher::new()),
            Arc::new(MockNotifier::new()),
        )
        .with_notify_delay(Duration::ZERO)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_scrape(theme: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/scrape")
            .header("content-type", "application/json")
            .body(Body::from(format!(r#"{{"theme": "{theme}"}}"#)))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_202_with_pending_job_id() {
        let app = build_app(test_manager());

        let response = app.oneshot(post_scrape("gardening")).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "pending");
        assert!(body["data"]["jobId"].as_str().unwrap().parse::<Uuid>().is_ok());
    }

    #[tokio::test]
    async fn invalid_themes_are_rejected_with_400() {
        let app = build_app(test_manager());

        let too_long = "a".repeat(51);
        for theme in ["", "ab", "rust 2024", too_long.as_str()] {
            let response = app.clone().oneshot(post_scrape(theme)).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "theme {theme:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn status_of_unknown_job_is_404() {
        let app = build_app(test_manager());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/status/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_job_id_is_400_on_reads() {
        let app = build_app(test_manager());

        for path in ["/status/not-a-uuid", "/results/not-a-uuid"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn delete_swallows_malformed_and_unknown_ids() {
        let app = build_app(test_manager());

        for path in [
            "/scrape/not-a-uuid".to_string(),
            format!("/scrape/{}", Uuid::new_v4()),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("DELETE")
                        .uri(path)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn results_and_history_reflect_a_finished_job() {
        let manager = test_manager();
        let app = build_app(manager.clone());

        let id = manager.create_job("gardening").await.unwrap();
        // wait for the detached pipeline to finish
        for _ in 0..500 {
            if manager
                .job_status(id)
                .await
                .is_some_and(|job| job.status.is_terminal())
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/results/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "completed");
        assert_eq!(body["data"]["listings"].as_array().unwrap().len(), 1);

        let response = app
            .oneshot(Request::builder().uri("/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        let history = body["data"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["theme"], "gardening");
    }

    #[test]
    fn theme_validation_rules() {
        assert!(validate_theme("art").is_ok());
        assert!(validate_theme("science fiction").is_ok());
        assert!(validate_theme("").is_err());
        assert!(validate_theme("ab").is_err());
        assert!(validate_theme(&"a".repeat(51)).is_err());
        assert!(validate_theme("sci-fi").is_err());
        assert!(validate_theme("year 2024").is_err());
    }

    #[test]
    fn theme_length_is_counted_in_characters_not_bytes() {
        // U+3000 is whitespace but three bytes in UTF-8
        assert!(validate_theme("ab\u{3000}").is_ok());

        // 48 letters + two wide spaces: 50 characters, 54 bytes
        let wide = format!("{}\u{3000}\u{3000}", "a".repeat(48));
        assert!(validate_theme(&wide).is_ok());

        let too_long = format!("{}\u{3000}", "a".repeat(50));
        assert!(validate_theme(&too_long).is_err());
    }
}
