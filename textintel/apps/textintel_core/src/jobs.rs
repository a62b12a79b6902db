use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::job::{job_key, JobRecord, JobStatus};
use crate::models::task::TaskType;
use crate::store::{KvStore, StoreError};

#[derive(Clone)]
pub struct Jobs {
    store: Arc<dyn KvStore>,
    queue: String,
    ttl: Duration,
}

impl Jobs {
    pub fn new(store: Arc<dyn KvStore>, queue_name: &str, ttl: Duration) -> Self {
        Self {
            store,
            queue: format!("queue:{queue_name}"),
            ttl,
        }
    }

    /// Enqueue `payload` for `task` and return the new job id.
    pub async fn submit(&self, task: TaskType, payload: Value) -> Result<String, StoreError> {
        let record = JobRecord::queued(task, payload);
        // record before id, so a popped id always has a record behind it
        self.save(&record).await?;
        self.store.push(&self.queue, &record.id).await?;
        debug!(job_id = %record.id, %task, "job enqueued");
        Ok(record.id)
    }

    pub async fn status(&self, id: &str) -> Result<Option<JobStatus>, StoreError> {
        Ok(self.record(id).await?.map(|r| r.status))
    }

    /// Full record including the result once finished.
    pub async fn record(&self, id: &str) -> Result<Option<JobRecord>, StoreError> {
        let key = job_key(id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source })
    }

    /// Pop the next job and mark it running. Ids whose record has already
    /// expired are skipped.
    pub async fn claim(&self) -> Result<Option<JobRecord>, StoreError> {
        while let Some(id) = self.store.pop(&self.queue).await? {
            let Some(mut record) = self.record(&id).await? else {
                warn!(job_id = %id, "queued job has no record, skipping");
                continue;
            };
            record.transition(JobStatus::Running);
            self.save(&record).await?;
            return Ok(Some(record));
        }
        Ok(None)
    }

    pub async fn finish(
        &self,
        mut record: JobRecord,
        result: String,
    ) -> Result<JobRecord, StoreError> {
        record.result = Some(result);
        record.transition(JobStatus::Finished);
        self.save(&record).await?;
        Ok(record)
    }

    pub async fn fail(
        &self,
        mut record: JobRecord,
        error: String,
    ) -> Result<JobRecord, StoreError> {
        record.error = Some(error);
        record.transition(JobStatus::Failed);
        self.save(&record).await?;
        Ok(record)
    }

    async fn save(&self, record: &JobRecord) -> Result<(), StoreError> {
        let key = job_key(&record.id);
        let raw = serde_json::to_string(record)
            .map_err(|source| StoreError::Corrupt { key: key.clone(), source })?;
        self.store.set_ex(&key, &raw, self.ttl).await
    }
}
