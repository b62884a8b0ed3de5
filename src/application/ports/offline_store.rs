use crate::domain::entities::offline::{
    CollectionCacheStatus, PendingOperation, PendingOperationDraft,
};
use crate::domain::value_objects::offline::{CollectionName, OperationId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

/// Durable local home of queued mutations and offline read snapshots.
///
/// Any method may fail with [`AppError::Storage`]; callers treat that as "did not
/// happen, retry later". The queue itself is the source of truth for unsynced intent.
#[async_trait]
pub trait OfflineStore: Send + Sync {
    /// Opens the store on first call and reuses the handle afterwards.
    async fn initialize(&self) -> Result<(), AppError>;

    async fn enqueue(&self, draft: PendingOperationDraft) -> Result<PendingOperation, AppError>;

    /// Unsynced operations in enqueue order.
    async fn list_unsynced(&self) -> Result<Vec<PendingOperation>, AppError>;

    async fn count_unsynced(&self) -> Result<u64, AppError>;

    async fn get(&self, id: &OperationId) -> Result<Option<PendingOperation>, AppError>;

    /// Unknown ids are ignored.
    async fn mark_synced(&self, id: &OperationId) -> Result<(), AppError>;

    /// Removes every synced operation and returns how many were removed.
    async fn purge_synced(&self) -> Result<u64, AppError>;

    async fn replace_collection_cache(
        &self,
        collection: &CollectionName,
        records: Vec<Value>,
    ) -> Result<(), AppError>;

    async fn read_collection_cache(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<Value>, AppError>;

    async fn read_collection_cache_for_owner(
        &self,
        collection: &CollectionName,
        owner_id: &str,
    ) -> Result<Vec<Value>, AppError>;

    async fn cache_status(&self) -> Result<Vec<CollectionCacheStatus>, AppError>;

    /// Receives the unsynced count after every enqueue, mark and purge.
    fn subscribe_pending_count(&self) -> broadcast::Receiver<u64>;
}
