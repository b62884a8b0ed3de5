use crate::domain::value_objects::offline::{
    CollectionName, IdempotencyKey, OperationPayload, RecordId,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteRecord {
    pub id: Option<RecordId>,
    pub data: Value,
}

/// Per-collection CRUD surface of the hosted backend.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// `idempotency_key` is stable across replays of the same queued insert.
    async fn create(
        &self,
        collection: &CollectionName,
        payload: &OperationPayload,
        idempotency_key: &IdempotencyKey,
    ) -> Result<RemoteRecord, AppError>;

    async fn update(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        partial: &OperationPayload,
    ) -> Result<(), AppError>;

    async fn delete(&self, collection: &CollectionName, id: &RecordId) -> Result<(), AppError>;
}
