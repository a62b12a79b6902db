use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::Client;
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use super::{KvStore, StoreError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Redis-backed store.
///
/// The [`ConnectionManager`] is created lazily on the first command and then
/// shared; it reconnects on its own after the server drops. Queues are lists:
/// `LPUSH` on submit, `RPOP` on claim.
pub struct RedisStore {
    client: Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisStore {
    /// Parse `url` without connecting.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::open(url)?,
            conn: OnceCell::new(),
        })
    }

    async fn conn(&self) -> Result<ConnectionManager, StoreError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let manager = tokio::time::timeout(
                    CONNECT_TIMEOUT,
                    ConnectionManager::new(self.client.clone()),
                )
                .await
                .map_err(|_| StoreError::Unavailable("redis connect timed out".into()))??;
                info!("redis connection established");
                Ok::<_, StoreError>(manager)
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn().await?;
        let value = ::redis::cmd("GET")
            .arg(key)
            .query_async::<Option<String>>(&mut conn)
            .await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        // EX takes whole seconds and rejects 0
        ::redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn push(&self, queue: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        ::redis::cmd("LPUSH")
            .arg(queue)
            .arg(value)
            .query_async::<i64>(&mut conn)
            .await?;
        Ok(())
    }

    async fn pop(&self, queue: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn().await?;
        let value = ::redis::cmd("RPOP")
            .arg(queue)
            .query_async::<Option<String>>(&mut conn)
            .await?;
        Ok(value)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        ::redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}


#[cfg(all(test, feature = "redis-tests"))]
mod integration_tests {
    use std::sync::Arc;

    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::cache::Cache;
    use crate::jobs::Jobs;
    use crate::models::job::JobStatus;
    use crate::models::task::TaskType;

    fn live_store() -> RedisStore {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        RedisStore::open(&url).expect("invalid REDIS_URL")
    }

    // unique per test so runs never see each other's keys
    fn scoped(name: &str) -> String {
        format!("textintel-test:{}:{name}", Uuid::new_v4())
    }

    #[tokio::test]
    async fn redis_ping_succeeds() {
        live_store().ping().await.expect("Redis not reachable -- is it running?");
    }

    #[tokio::test]
    async fn redis_queue_is_fifo() {
        let store = live_store();
        let queue = scoped("queue");
        for item in ["a", "b", "c"] {
            store.push(&queue, item).await.unwrap();
        }
        assert_eq!(store.pop(&queue).await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.pop(&queue).await.unwrap().as_deref(), Some("b"));
        assert_eq!(store.pop(&queue).await.unwrap().as_deref(), Some("c"));
        assert_eq!(store.pop(&queue).await.unwrap(), None);
    }

    #[tokio::test]
    async fn redis_set_ex_then_get() {
        let store = live_store();
        let key = scoped("value");
        assert_eq!(store.get(&key).await.unwrap(), None);
        store.set_ex(&key, "hello", Duration::from_secs(30)).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn redis_values_expire() {
        let store = live_store();
        let key = scoped("expiring");
        store.set_ex(&key, "v", Duration::from_secs(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn redis_sub_second_ttl_rounds_up_to_one_second() {
        let store = live_store();
        let key = scoped("short");
        store.set_ex(&key, "v", Duration::from_millis(200)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("v"));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn redis_cache_hits_on_second_lookup() {
        let store: Arc<dyn KvStore> = Arc::new(live_store());
        let cache = Cache::new(store, Duration::from_secs(30));
        let params = json!({"text": scoped("text"), "tone": "formal"});

        assert_eq!(cache.get(TaskType::Rewrite, &params).await, None);
        cache.put(TaskType::Rewrite, &params, "Greetings.").await;
        assert_eq!(
            cache.get(TaskType::Rewrite, &params).await.as_deref(),
            Some("Greetings.")
        );
    }

    #[tokio::test]
    async fn redis_jobs_are_claimed_in_submission_order() {
        let store: Arc<dyn KvStore> = Arc::new(live_store());
        let jobs = Jobs::new(store, &scoped("genai"), Duration::from_secs(30));

        let first = jobs.submit(TaskType::Qa, json!({"n": 1})).await.unwrap();
        let second = jobs.submit(TaskType::Qa, json!({"n": 2})).await.unwrap();

        let claimed = jobs.claim().await.unwrap().unwrap();
        assert_eq!(claimed.id, first);
        assert_eq!(jobs.status(&first).await.unwrap(), Some(JobStatus::Running));
        jobs.finish(claimed, "done".into()).await.unwrap();

        assert_eq!(jobs.claim().await.unwrap().unwrap().id, second);
        assert_eq!(jobs.claim().await.unwrap(), None);

        let record = jobs.record(&first).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Finished);
        assert_eq!(record.result.as_deref(), Some("done"));
    }
}
