use super::rows::{CollectionCacheMetaRow, PendingOperationRow};
use crate::domain::entities::offline::{CollectionCacheStatus, PendingOperation};
use crate::domain::value_objects::offline::{
    CollectionName, IdempotencyKey, OperationId, OperationKind, OperationPayload, RECORD_ID_FIELD,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::Value;

pub fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Storage(format!("invalid stored timestamp: {millis}")))
}

pub fn pending_operation_from_row(row: PendingOperationRow) -> Result<PendingOperation, AppError> {
    let payload = OperationPayload::from_json_str(&row.payload).map_err(AppError::Storage)?;

    Ok(PendingOperation {
        seq: row.seq,
        id: OperationId::new(row.operation_id).map_err(AppError::Storage)?,
        collection: CollectionName::new(row.collection).map_err(AppError::Storage)?,
        kind: row.kind.parse::<OperationKind>().map_err(AppError::Storage)?,
        payload,
        idempotency_key: IdempotencyKey::new(row.idempotency_key).map_err(AppError::Storage)?,
        created_at: millis_to_datetime(row.created_at)?,
        synced: row.synced,
    })
}

pub fn cache_status_from_row(row: CollectionCacheMetaRow) -> Result<CollectionCacheStatus, AppError> {
    Ok(CollectionCacheStatus {
        collection: CollectionName::new(row.collection).map_err(AppError::Storage)?,
        record_count: u64::try_from(row.record_count).unwrap_or(0),
        refreshed_at: millis_to_datetime(row.refreshed_at)?,
    })
}

/// Key and owner columns extracted from a cached record.
pub struct CachedRecordColumns {
    pub record_key: Option<String>,
    pub owner_id: Option<String>,
    pub data: String,
}

pub fn cached_record_columns(record: &Value) -> Result<CachedRecordColumns, AppError> {
    let field = |name: &str| -> Option<String> {
        match record.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };

    Ok(CachedRecordColumns {
        record_key: field(RECORD_ID_FIELD),
        owner_id: field("user_id").or_else(|| field("owner_id")),
        data: serde_json::to_string(record)?,
    })
}
