use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{Datasets, StorageBackend};
use crate::{Result, StoreError};

/// In-memory storage backend for testing.
///
/// Clones share the same persisted state, so a test can keep one clone to
/// inspect what a [`DataStore`](crate::DataStore) wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    persisted: Arc<RwLock<Option<Datasets>>>,
    fail_on_write: Arc<AtomicBool>,
    // 1-based position of the upcoming write that fails once; 0 when unset.
    failing_write: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures every following write to fail until switched off.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail_on_write.store(fail, Ordering::SeqCst);
    }

    /// Lets the next `successes` writes through, fails the one after, then
    /// accepts writes again.
    pub fn fail_write_after(&self, successes: usize) {
        self.failing_write.store(successes + 1, Ordering::SeqCst);
    }

    /// Returns the number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns true if anything has been written and not deleted since.
    pub async fn is_persisted(&self) -> bool {
        self.persisted.read().await.is_some()
    }

    /// Returns a copy of the persisted datasets.
    pub async fn snapshot(&self) -> Datasets {
        self.persisted.read().await.clone().unwrap_or_default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    async fn read(&self) -> Result<Datasets> {
        Ok(self.snapshot().await)
    }

    async fn write(&self, datasets: &Datasets) -> Result<()> {
        if self.fail_on_write.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write rejected".to_string()));
        }

        let countdown = self
            .failing_write
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if countdown == Ok(1) {
            return Err(StoreError::Backend("write rejected".to_string()));
        }

        *self.persisted.write().await = Some(datasets.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.persisted.write().await.take();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
