use super::mappers::{
    cache_status_from_row, cached_record_columns, millis_to_datetime, pending_operation_from_row,
};
use super::rows::{CollectionCacheMetaRow, PendingOperationRow};
use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::offline::{
    CollectionCacheStatus, PendingOperation, PendingOperationDraft,
};
use crate::domain::value_objects::offline::{CollectionName, IdempotencyKey, OperationId};
use crate::infrastructure::database::ConnectionPool;
use crate::shared::config::DatabaseConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use tokio::sync::{broadcast, OnceCell};

const PENDING_COUNT_CHANNEL_CAPACITY: usize = 32;

const SELECT_OPERATION_COLUMNS: &str = r#"
    SELECT seq, operation_id, collection, kind, payload, idempotency_key, created_at, synced
    FROM pending_operations
"#;

pub struct SqliteOfflineStore {
    config: DatabaseConfig,
    pool: OnceCell<ConnectionPool>,
    pending_tx: broadcast::Sender<u64>,
}

impl SqliteOfflineStore {
    /// The database is opened lazily by [`OfflineStore::initialize`] or the first call that needs it.
    pub fn new(config: DatabaseConfig) -> Self {
        let (pending_tx, _) = broadcast::channel(PENDING_COUNT_CHANNEL_CAPACITY);
        Self {
            config,
            pool: OnceCell::new(),
            pending_tx,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(DatabaseConfig::in_memory())
    }

    /// Wraps an already open pool, applying migrations first.
    pub async fn with_pool(pool: ConnectionPool) -> Result<Self, AppError> {
        pool.migrate().await?;
        let (pending_tx, _) = broadcast::channel(PENDING_COUNT_CHANNEL_CAPACITY);
        Ok(Self {
            config: DatabaseConfig::default(),
            pool: OnceCell::new_with(Some(pool)),
            pending_tx,
        })
    }

    async fn pool(&self) -> Result<&SqlitePool, AppError> {
        let pool = self
            .pool
            .get_or_try_init(|| ConnectionPool::open(&self.config))
            .await?;
        Ok(pool.get_pool())
    }

    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }

    async fn publish_pending_count(&self) {
        match self.count_unsynced().await {
            Ok(count) => {
                // no receivers is fine
                let _ = self.pending_tx.send(count);
            }
            Err(err) => {
                tracing::warn!(
                    target: "offline::store",
                    error = %err,
                    "failed to refresh pending count"
                );
            }
        }
    }
}

#[async_trait]
impl OfflineStore for SqliteOfflineStore {
    async fn initialize(&self) -> Result<(), AppError> {
        self.pool().await.map(|_| ())
    }

    async fn enqueue(&self, draft: PendingOperationDraft) -> Result<PendingOperation, AppError> {
        let pool = self.pool().await?;

        let id = OperationId::generate();
        let idempotency_key = IdempotencyKey::generate();
        let created_at_ms = Utc::now().timestamp_millis();
        let payload = draft.payload.to_json_string()?;

        let result = sqlx::query(
            r#"
            INSERT INTO pending_operations (
                operation_id, collection, kind, payload,
                idempotency_key, created_at, synced
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
            "#,
        )
        .bind(id.as_str())
        .bind(draft.collection.as_str())
        .bind(draft.kind.as_str())
        .bind(&payload)
        .bind(idempotency_key.as_str())
        .bind(created_at_ms)
        .execute(pool)
        .await?;

        let operation = PendingOperation {
            seq: result.last_insert_rowid(),
            id,
            collection: draft.collection,
            kind: draft.kind,
            payload: draft.payload,
            idempotency_key,
            created_at: millis_to_datetime(created_at_ms)?,
            synced: false,
        };

        tracing::debug!(
            target: "offline::store",
            id = %operation.id,
            seq = operation.seq,
            collection = %operation.collection,
            kind = %operation.kind,
            "operation enqueued"
        );

        self.publish_pending_count().await;
        Ok(operation)
    }

    async fn list_unsynced(&self) -> Result<Vec<PendingOperation>, AppError> {
        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, PendingOperationRow>(&format!(
            "{SELECT_OPERATION_COLUMNS} WHERE synced = 0 ORDER BY seq ASC"
        ))
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(pending_operation_from_row).collect()
    }

    async fn count_unsynced(&self) -> Result<u64, AppError> {
        let pool = self.pool().await?;
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM pending_operations WHERE synced = 0")
                .fetch_one(pool)
                .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn get(&self, id: &OperationId) -> Result<Option<PendingOperation>, AppError> {
        let pool = self.pool().await?;
        let row = sqlx::query_as::<_, PendingOperationRow>(&format!(
            "{SELECT_OPERATION_COLUMNS} WHERE operation_id = ?1"
        ))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

        row.map(pending_operation_from_row).transpose()
    }

    async fn mark_synced(&self, id: &OperationId) -> Result<(), AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("UPDATE pending_operations SET synced = 1 WHERE operation_id = ?1")
            .bind(id.as_str())
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(
                target: "offline::store",
                id = %id,
                "mark_synced ignored unknown operation"
            );
            return Ok(());
        }

        self.publish_pending_count().await;
        Ok(())
    }

    async fn purge_synced(&self) -> Result<u64, AppError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM pending_operations WHERE synced = 1")
            .execute(pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            tracing::debug!(target: "offline::store", purged, "synced operations purged");
            self.publish_pending_count().await;
        }
        Ok(purged)
    }

    async fn replace_collection_cache(
        &self,
        collection: &CollectionName,
        records: Vec<Value>,
    ) -> Result<(), AppError> {
        // encode everything up front so a bad record cannot leave a half-written snapshot
        let columns = records
            .iter()
            .map(cached_record_columns)
            .collect::<Result<Vec<_>, _>>()?;

        let pool = self.pool().await?;
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM collection_cache WHERE collection = ?1")
            .bind(collection.as_str())
            .execute(&mut *tx)
            .await?;

        for (position, record) in columns.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO collection_cache (collection, position, record_key, owner_id, data)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(collection.as_str())
            .bind(position as i64)
            .bind(record.record_key.as_deref())
            .bind(record.owner_id.as_deref())
            .bind(&record.data)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO collection_cache_meta (collection, record_count, refreshed_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(collection) DO UPDATE SET
                record_count = excluded.record_count,
                refreshed_at = excluded.refreshed_at
            "#,
        )
        .bind(collection.as_str())
        .bind(columns.len() as i64)
        .bind(Utc::now().timestamp_millis())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            target: "offline::cache",
            collection = %collection,
            records = columns.len(),
            "collection cache replaced"
        );
        Ok(())
    }

    async fn read_collection_cache(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<Value>, AppError> {
        let pool = self.pool().await?;
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT data FROM collection_cache WHERE collection = ?1 ORDER BY position ASC",
        )
        .bind(collection.as_str())
        .fetch_all(pool)
        .await?;

        rows.iter()
            .map(|data| serde_json::from_str(data).map_err(AppError::from))
            .collect()
    }

    async fn read_collection_cache_for_owner(
        &self,
        collection: &CollectionName,
        owner_id: &str,
    ) -> Result<Vec<Value>, AppError> {
        let pool = self.pool().await?;
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT data FROM collection_cache
            WHERE collection = ?1 AND owner_id = ?2
            ORDER BY position ASC
            "#,
        )
        .bind(collection.as_str())
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        rows.iter()
            .map(|data| serde_json::from_str(data).map_err(AppError::from))
            .collect()
    }

    async fn cache_status(&self) -> Result<Vec<CollectionCacheStatus>, AppError> {
        let pool = self.pool().await?;
        let rows = sqlx::query_as::<_, CollectionCacheMetaRow>(
            r#"
            SELECT collection, record_count, refreshed_at
            FROM collection_cache_meta
            ORDER BY collection ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(cache_status_from_row).collect()
    }

    fn subscribe_pending_count(&self) -> broadcast::Receiver<u64> {
        self.pending_tx.subscribe()
    }
}
