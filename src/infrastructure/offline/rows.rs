use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PendingOperationRow {
    pub seq: i64,
    pub operation_id: String,
    pub collection: String,
    pub kind: String,
    pub payload: String,
    pub idempotency_key: String,
    pub created_at: i64,
    pub synced: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct CollectionCacheMetaRow {
    pub collection: String,
    pub record_count: i64,
    pub refreshed_at: i64,
}
