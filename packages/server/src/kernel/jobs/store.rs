//! In-memory job registry with safe concurrent access.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::job::Job;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job {0} already exists")]
    DuplicateId(Uuid),
}

/// Cloneable handle to the authoritative job-id -> [`Job`] mapping.
///
/// Readers (status polls) get cloned snapshots; the owning pipeline replaces
/// the whole record on each transition, so a reader never observes a torn
/// update. Each job is written only by its own pipeline instance.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record. Rejects a duplicate id rather than silently
    /// overwriting an existing job.
    pub async fn insert(&self, job: Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::DuplicateId(job.id));
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    /// Snapshot of the current record, if any.
    pub async fn get(&self, id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Remove a record. Absent ids are a no-op (idempotent deletion).
    pub async fn remove(&self, id: Uuid) -> Option<Job> {
        self.jobs.write().await.remove(&id)
    }

    /// Snapshot of all current records; iteration order is not meaningful.
    pub async fn list(&self) -> Vec<Job> {
        self.jobs.read().await.values().cloned().collect()
    }

    /// Apply a transition to a copy of the record and swap it back in
    /// atomically. Returns the updated snapshot, or `None` when the id is
    /// absent - a pipeline whose job was deleted mid-flight simply loses
    /// its final write.
    pub async fn update<F>(&self, id: Uuid, f: F) -> Option<Job>
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().await;
        let mut job = jobs.get(&id).cloned()?;
        f(&mut job);
        jobs.insert(id, job.clone());
        Some(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::jobs::JobStatus;

    #[tokio::test]
    async fn insert_and_get_roundtrip() {
        let store = JobStore::new();
        let job = Job::new("gardening");
        let id = job.id;

        store.insert(job).await.unwrap();
        let snapshot = store.get(id).await.unwrap();
        assert_eq!(snapshot.theme, "gardening");
        assert_eq!(snapshot.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = JobStore::new();
        let job = Job::new("gardening");
        let dup = job.clone();

        store.insert(job).await.unwrap();
        assert!(matches!(
            store.insert(dup).await,
            Err(StoreError::DuplicateId(_))
        ));
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = JobStore::new();
        let job = Job::new("gardening");
        let id = job.id;
        store.insert(job).await.unwrap();

        assert!(store.remove(id).await.is_some());
        assert!(store.remove(id).await.is_none());
        assert!(store.remove(Uuid::new_v4()).await.is_none());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn update_after_delete_is_a_noop() {
        let store = JobStore::new();
        let job = Job::new("gardening");
        let id = job.id;
        store.insert(job).await.unwrap();
        store.remove(id).await;

        let updated = store.update(id, |job| job.mark_processing()).await;
        assert!(updated.is_none());
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn update_replaces_whole_record() {
        let store = JobStore::new();
        let job = Job::new("gardening");
        let id = job.id;
        store.insert(job).await.unwrap();

        let updated = store.update(id, |job| job.fail("boom")).await.unwrap();
        assert_eq!(updated.status, JobStatus::Failed);

        let snapshot = store.get(id).await.unwrap();
        assert_eq!(snapshot.status, JobStatus::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("boom"));
    }
}
