use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use textintel_core::cache::Cache;
use textintel_core::jobs::Jobs;
use textintel_core::models::job::JobRecord;
use textintel_core::store::StoreError;
use tracing::{info, warn};

use crate::pipelines::TextModels;
use crate::tasks::TaskRequest;

pub struct Worker {
    jobs: Jobs,
    cache: Cache,
    models: Arc<dyn TextModels>,
    poll: Duration,
}

impl Worker {
    pub fn new(jobs: Jobs, cache: Cache, models: Arc<dyn TextModels>, poll: Duration) -> Self {
        Self { jobs, cache, models, poll }
    }

    /// Process jobs until `shutdown` resolves. A job in progress always runs
    /// to completion; shutdown is only observed between jobs.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        info!(poll_ms = self.poll.as_millis() as u64, "worker started");
        loop {
            let delay = match self.run_once().await {
                Ok(true) => Duration::ZERO,
                Ok(false) => self.poll,
                Err(err) => {
                    warn!(error = %err, "queue unavailable");
                    self.poll
                }
            };
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        info!("worker stopped");
    }

    /// Claim and process a single job. Returns `false` when the queue is empty.
    pub async fn run_once(&self) -> Result<bool, StoreError> {
        let Some(job) = self.jobs.claim().await? else {
            return Ok(false);
        };
        let job_id = job.id.clone();
        info!(%job_id, task = %job.task, "job started");

        match self.execute(&job).await {
            Ok(result) => {
                self.jobs.finish(job, result).await?;
                info!(%job_id, "job finished");
            }
            Err(error) => {
                warn!(%job_id, %error, "job failed");
                self.jobs.fail(job, error).await?;
            }
        }
        Ok(true)
    }

    async fn execute(&self, job: &JobRecord) -> Result<String, String> {
        let req = TaskRequest::from_payload(job.task, job.payload.clone())
            .map_err(|e| e.to_string())?;
        let params = req.params();

        if let Some(hit) = self.cache.get(job.task, &params).await {
            return Ok(hit);
        }
        let result = req
            .execute(self.models.as_ref())
            .await
            .map_err(|e| e.to_string())?;
        self.cache.put(job.task, &params, &result).await;
        Ok(result)
    }
}
