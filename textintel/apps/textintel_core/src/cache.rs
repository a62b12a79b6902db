use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::models::task::TaskType;
use crate::store::KvStore;

#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
    ttl: Duration,
}

impl Cache {
    pub fn new(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Cached output for `params`, or `None` on a miss or any store error.
    pub async fn get(&self, task: TaskType, params: &Value) -> Option<String> {
        let key = cache_key(task, params);
        match self.store.get(&key).await {
            Ok(hit) => {
                debug!(%key, hit = hit.is_some(), "cache lookup");
                hit
            }
            Err(err) => {
                warn!(%key, error = %err, "cache read failed, bypassing cache");
                None
            }
        }
    }

    /// Store `value` for `params`. Store errors are logged and dropped.
    pub async fn put(&self, task: TaskType, params: &Value, value: &str) {
        let key = cache_key(task, params);
        if let Err(err) = self.store.set_ex(&key, value, self.ttl).await {
            warn!(%key, error = %err, "cache write failed");
        }
    }
}

// cache:{task}:{sha256 of the params with object keys sorted}
pub fn cache_key(task: TaskType, params: &Value) -> String {
    let canonical = canonical(params).to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    format!("cache:{}:{}", task.as_str(), hex::encode(digest))
}

// rebuilt with sorted keys so the output does not depend on map ordering
fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonical(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}
