use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::offline::{
    CollectionCacheStatus, PendingOperation, PendingOperationDraft,
};
use crate::domain::value_objects::offline::{
    CollectionName, OperationId, OperationKind, OperationPayload,
};
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;

/// Entry point for feature code: record mutations while offline and read snapshots back.
pub struct OfflineService {
    store: Arc<dyn OfflineStore>,
}

impl OfflineService {
    pub fn new(store: Arc<dyn OfflineStore>) -> Self {
        Self { store }
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        self.store.initialize().await
    }

    /// Queues a mutation and returns its assigned id.
    pub async fn enqueue(
        &self,
        collection: CollectionName,
        kind: OperationKind,
        payload: OperationPayload,
    ) -> Result<OperationId, AppError> {
        let draft =
            PendingOperationDraft::new(collection, kind, payload).map_err(AppError::ValidationError)?;
        let operation = self.store.enqueue(draft).await?;
        Ok(operation.id)
    }

    /// Same as [`enqueue`](Self::enqueue) but accepts raw names and JSON from the UI layer.
    pub async fn record_mutation(
        &self,
        collection: &str,
        kind: OperationKind,
        payload: Value,
    ) -> Result<PendingOperation, AppError> {
        let collection = CollectionName::try_from(collection).map_err(AppError::ValidationError)?;
        let payload = OperationPayload::new(payload).map_err(AppError::ValidationError)?;
        let draft =
            PendingOperationDraft::new(collection, kind, payload).map_err(AppError::ValidationError)?;

        let operation = self.store.enqueue(draft).await?;
        tracing::debug!(
            target: "offline::store",
            operation_id = %operation.id,
            collection = %operation.collection,
            kind = %operation.kind,
            "mutation queued"
        );
        Ok(operation)
    }

    pub async fn list_unsynced(&self) -> Result<Vec<PendingOperation>, AppError> {
        self.store.list_unsynced().await
    }

    pub async fn pending_count(&self) -> Result<u64, AppError> {
        self.store.count_unsynced().await
    }

    pub async fn refresh_cache(
        &self,
        collection: &CollectionName,
        records: Vec<Value>,
    ) -> Result<(), AppError> {
        self.store.replace_collection_cache(collection, records).await
    }

    pub async fn cached_records(&self, collection: &CollectionName) -> Result<Vec<Value>, AppError> {
        self.store.read_collection_cache(collection).await
    }

    pub async fn cached_records_for_owner(
        &self,
        collection: &CollectionName,
        owner_id: &str,
    ) -> Result<Vec<Value>, AppError> {
        self.store
            .read_collection_cache_for_owner(collection, owner_id)
            .await
    }

    pub async fn cache_status(&self) -> Result<Vec<CollectionCacheStatus>, AppError> {
        self.store.cache_status().await
    }
}
