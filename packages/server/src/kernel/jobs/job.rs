//! Job record and lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::listing::Listing;

/// Job lifecycle states.
///
/// Transitions are monotonic along `pending -> processing -> {completed | failed}`;
/// terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One theme-driven unit of work tracked from creation to terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub theme: String,
    pub status: JobStatus,
    /// Set exactly once, atomically, when the job completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listings: Option<Vec<Listing>>,
    /// Set exactly once, when the job fails; exactly one cause is retained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a fresh pending job for a theme.
    pub fn new(theme: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            theme: theme.into(),
            status: JobStatus::Pending,
            listings: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the job as picked up by its pipeline. No-op once terminal.
    pub fn mark_processing(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Processing;
        self.updated_at = Utc::now();
    }

    /// Transition into `completed`, publishing the full listing batch.
    /// No-op once terminal.
    pub fn complete(&mut self, listings: Vec<Listing>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Completed;
        self.listings = Some(listings);
        self.updated_at = Utc::now();
    }

    /// Transition into `failed` with a human-readable cause.
    /// No-op once terminal.
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_is_pending_with_no_results() {
        let job = Job::new("rust programming");

        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.listings.is_none());
        assert!(job.error.is_none());
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn processing_then_complete_updates_timestamps() {
        let mut job = Job::new("history");
        let created = job.updated_at;

        job.mark_processing();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.updated_at >= created);

        job.complete(vec![]);
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.listings.is_some());
    }

    #[test]
    fn terminal_states_are_sticky() {
        let mut job = Job::new("history");
        job.mark_processing();
        job.complete(vec![]);

        // a stray late failure must not overwrite the completed state
        job.fail("late failure");
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.error.is_none());

        let mut failed = Job::new("history");
        failed.fail("boom");
        failed.complete(vec![]);
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(failed.listings.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Failed).unwrap(),
            "\"failed\""
        );
    }
}
