use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{KvStore, StoreError};

/// Process-local store with passive expiry. Expired values are dropped when
/// they are next read.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    values: HashMap<String, (String, Instant)>,
    queues: HashMap<String, VecDeque<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn queue_len(&self, queue: &str) -> usize {
        self.inner.lock().queues.get(queue).map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut inner = self.inner.lock();
        let Some((value, expires_at)) = inner.values.get(key) else {
            return Ok(None);
        };
        if *expires_at > Instant::now() {
            return Ok(Some(value.clone()));
        }
        inner.values.remove(key);
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.inner
            .lock()
            .values
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn push(&self, queue: &str, value: &str) -> Result<(), StoreError> {
        self.inner
            .lock()
            .queues
            .entry(queue.to_string())
            .or_default()
            .push_back(value.to_string());
        Ok(())
    }

    async fn pop(&self, queue: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .inner
            .lock()
            .queues
            .get_mut(queue)
            .and_then(VecDeque::pop_front))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
