use async_trait::async_trait;
use plantera_offline::application::ports::OfflineStore;
use plantera_offline::domain::entities::offline::{
    CollectionCacheStatus, PendingOperation, PendingOperationDraft,
};
use plantera_offline::domain::value_objects::offline::{CollectionName, OperationId};
use plantera_offline::shared::error::AppError;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Delegates to a real store but can be told to fail individual writes.
pub struct FailingStore {
    inner: Arc<dyn OfflineStore>,
    mark_failures: AtomicUsize,
    fail_purge: AtomicBool,
    fail_count: AtomicBool,
}

impl FailingStore {
    pub fn new(inner: Arc<dyn OfflineStore>) -> Self {
        Self {
            inner,
            mark_failures: AtomicUsize::new(0),
            fail_purge: AtomicBool::new(false),
            fail_count: AtomicBool::new(false),
        }
    }

    /// The next `n` calls to `mark_synced` fail.
    pub fn fail_next_marks(&self, n: usize) {
        self.mark_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_purge(&self, fail: bool) {
        self.fail_purge.store(fail, Ordering::SeqCst);
    }

    pub fn fail_count(&self, fail: bool) {
        self.fail_count.store(fail, Ordering::SeqCst);
    }

    fn disk_full() -> AppError {
        AppError::Storage("disk full".into())
    }
}

#[async_trait]
impl OfflineStore for FailingStore {
    async fn initialize(&self) -> Result<(), AppError> {
        self.inner.initialize().await
    }

    async fn enqueue(&self, draft: PendingOperationDraft) -> Result<PendingOperation, AppError> {
        self.inner.enqueue(draft).await
    }

    async fn list_unsynced(&self) -> Result<Vec<PendingOperation>, AppError> {
        self.inner.list_unsynced().await
    }

    async fn count_unsynced(&self) -> Result<u64, AppError> {
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(Self::disk_full());
        }
        self.inner.count_unsynced().await
    }

    async fn get(&self, id: &OperationId) -> Result<Option<PendingOperation>, AppError> {
        self.inner.get(id).await
    }

    async fn mark_synced(&self, id: &OperationId) -> Result<(), AppError> {
        let armed = self
            .mark_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if armed {
            return Err(Self::disk_full());
        }
        self.inner.mark_synced(id).await
    }

    async fn purge_synced(&self) -> Result<u64, AppError> {
        if self.fail_purge.load(Ordering::SeqCst) {
            return Err(Self::disk_full());
        }
        self.inner.purge_synced().await
    }

    async fn replace_collection_cache(
        &self,
        collection: &CollectionName,
        records: Vec<Value>,
    ) -> Result<(), AppError> {
        self.inner.replace_collection_cache(collection, records).await
    }

    async fn read_collection_cache(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<Value>, AppError> {
        self.inner.read_collection_cache(collection).await
    }

    async fn read_collection_cache_for_owner(
        &self,
        collection: &CollectionName,
        owner_id: &str,
    ) -> Result<Vec<Value>, AppError> {
        self.inner
            .read_collection_cache_for_owner(collection, owner_id)
            .await
    }

    async fn cache_status(&self) -> Result<Vec<CollectionCacheStatus>, AppError> {
        self.inner.cache_status().await
    }

    fn subscribe_pending_count(&self) -> broadcast::Receiver<u64> {
        self.inner.subscribe_pending_count()
    }
}
