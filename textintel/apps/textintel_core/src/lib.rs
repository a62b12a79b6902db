pub mod cache;
pub mod jobs;
pub mod models;
pub mod serializers;
pub mod store;
pub mod urls;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::Cache;
use crate::jobs::Jobs;
use crate::store::{redis::RedisStore, KvStore, StoreError};

#[derive(Clone, Debug)]
pub struct Cfg {
    /// Redis connection string. Override with REDIS_URL.
    pub redis_url: String,
    /// Lifetime of cached pipeline outputs (default 1 day). Override with CACHE_TTL.
    pub cache_ttl: Duration,
    /// Lifetime of job records (default 1h). Override with JOB_TTL.
    pub job_ttl: Duration,
    /// Name of the work queue shared by gateway and workers.
    pub queue_name: String,
    /// Idle wait between queue polls in the worker (default 500ms).
    pub worker_poll: Duration,
}

impl Cfg {
    pub fn from_env() -> Self {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or("redis://localhost:6379/0".into());
        let cache_ttl_secs = std::env::var("CACHE_TTL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400); // 1 day
        let job_ttl_secs = std::env::var("JOB_TTL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600); // 1 hour
        let queue_name = std::env::var("QUEUE_NAME").unwrap_or("genai".into());
        let worker_poll_ms = std::env::var("WORKER_POLL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(500);

        Self {
            redis_url,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            job_ttl: Duration::from_secs(job_ttl_secs),
            queue_name,
            worker_poll: Duration::from_millis(worker_poll_ms),
        }
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379/0".into(),
            cache_ttl: Duration::from_secs(86_400),
            job_ttl: Duration::from_secs(3600),
            queue_name: "genai".into(),
            worker_poll: Duration::from_millis(500),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub cache: Cache,
    pub jobs: Jobs,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, cfg: &Cfg) -> Self {
        Self {
            cache: Cache::new(store.clone(), cfg.cache_ttl),
            jobs: Jobs::new(store.clone(), &cfg.queue_name, cfg.job_ttl),
            store,
        }
    }
}

/// Build state backed by Redis. The connection itself is opened on first use,
/// so an unreachable server shows up in `/health` rather than at startup.
pub fn connect(cfg: &Cfg) -> Result<AppState, StoreError> {
    let store = RedisStore::open(&cfg.redis_url)?;
    info!(queue = %cfg.queue_name, "redis store configured");
    Ok(AppState::new(Arc::new(store), cfg))
}
