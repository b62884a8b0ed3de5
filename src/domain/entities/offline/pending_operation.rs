use crate::domain::value_objects::offline::{
    CollectionName, IdempotencyKey, OperationId, OperationKind, OperationPayload, RecordId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mutation intent not yet written to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingOperationDraft {
    pub collection: CollectionName,
    pub kind: OperationKind,
    pub payload: OperationPayload,
}

impl PendingOperationDraft {
    /// Update and delete drafts must name their target record in the payload.
    pub fn new(
        collection: CollectionName,
        kind: OperationKind,
        payload: OperationPayload,
    ) -> Result<Self, String> {
        if kind.requires_record_id() && payload.record_id().is_none() {
            return Err(format!(
                "{kind} on {collection} requires a record id in the payload"
            ));
        }
        Ok(Self {
            collection,
            kind,
            payload,
        })
    }
}

/// A queued mutation. Only `synced` changes after enqueue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingOperation {
    /// Store-assigned enqueue position, strictly increasing and never reused.
    pub seq: i64,
    pub id: OperationId,
    pub collection: CollectionName,
    pub kind: OperationKind,
    pub payload: OperationPayload,
    pub idempotency_key: IdempotencyKey,
    pub created_at: DateTime<Utc>,
    pub synced: bool,
}

impl PendingOperation {
    pub fn record_id(&self) -> Option<RecordId> {
        self.payload.record_id()
    }
}
